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

//! Catalog store.
//!
//! Holds the current [`CatalogSnapshot`] behind an `Arc` so readers can keep
//! a consistent view while the sync service swaps in a new one.

use std::sync::Arc;

use crate::model::{CatalogSnapshot, Item, ItemId, Provenance};

pub struct CatalogStore {
    snapshot: Arc<CatalogSnapshot>,
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogStore {
    pub fn new() -> Self {
        Self {
            snapshot: Arc::new(CatalogSnapshot::empty()),
        }
    }

    pub fn from_snapshot(snapshot: CatalogSnapshot) -> Self {
        Self {
            snapshot: Arc::new(snapshot),
        }
    }

    /// Swaps the whole catalog.
    pub fn replace(&mut self, snapshot: CatalogSnapshot) {
        self.snapshot = Arc::new(snapshot);
    }

    pub fn snapshot(&self) -> Arc<CatalogSnapshot> {
        Arc::clone(&self.snapshot)
    }

    pub fn all(&self) -> &[Item] {
        self.snapshot.items()
    }

    pub fn len(&self) -> usize {
        self.snapshot.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.is_empty()
    }

    pub fn provenance(&self) -> Provenance {
        self.snapshot.provenance
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.all().iter().find(|item| item.id == id)
    }

    pub(crate) fn position(&self, id: ItemId) -> Option<usize> {
        self.all().iter().position(|item| item.id == id)
    }

    /// Records the cleanliness of an item for the rest of the session.
    ///
    /// Outstanding snapshots handed out by [`CatalogStore::snapshot`] are not
    /// affected. Returns `false` when the item is unknown.
    pub fn mark_dirty(&mut self, id: ItemId, is_dirty: bool) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        let snapshot = Arc::make_mut(&mut self.snapshot);
        snapshot.items_mut()[index].is_dirty = is_dirty;
        true
    }

    /// Distinct upper-case initials of all item names, in order.
    pub fn available_letters(&self) -> Vec<char> {
        let mut letters: Vec<char> = self
            .all()
            .iter()
            .filter_map(|item| first_letter(&item.name))
            .collect();
        letters.sort_unstable();
        letters.dedup();
        letters
    }

    /// Items whose name starts with `prefix`, ignoring case. An empty prefix
    /// matches nothing.
    pub fn search_prefix(&self, prefix: &str) -> Vec<&Item> {
        if prefix.is_empty() {
            return vec![];
        }
        let prefix = prefix.to_lowercase();
        self.all()
            .iter()
            .filter(|item| item.name.to_lowercase().starts_with(&prefix))
            .collect()
    }

    /// The items shown on a grid page starting at `offset`.
    pub fn page(&self, offset: usize, page_size: usize) -> &[Item] {
        let items = self.all();
        let start = offset.min(items.len());
        let end = offset.saturating_add(page_size).min(items.len());
        &items[start..end]
    }
}

fn first_letter(name: &str) -> Option<char> {
    name.chars().next().map(|c| c.to_ascii_uppercase())
}
