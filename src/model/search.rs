// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Search query state.
//!
//! This module provides the text buffer edited by the on-screen keyboard and
//! the list of matching items it produces.

use crate::model::{ItemId, catalog::CatalogStore};

pub const MAX_QUERY_LEN: usize = 15;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    text: String,
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Appends a character, returning `false` if the query is already full.
    pub fn push(&mut self, c: char) -> bool {
        if self.text.chars().count() >= MAX_QUERY_LEN {
            return false;
        }
        self.text.push(c);
        true
    }

    pub fn backspace(&mut self) -> bool {
        self.text.pop().is_some()
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// Ids of the items matching the query, in catalog order.
    pub fn matches(&self, store: &CatalogStore) -> Vec<ItemId> {
        store
            .search_prefix(&self.text)
            .iter()
            .map(|item| item.id)
            .collect()
    }
}
