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

//! Rendering seam.
//!
//! The state machine never draws. It describes what the active screen shows
//! as a [`ScreenDescriptor`] and hands it to a [`Renderer`].

use anyhow::Result;

use crate::{
    model::{Category, ItemId},
    theme::Rgb565,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridCell {
    pub item_id: ItemId,
    pub label: String,
    pub colour: Rgb565,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenDescriptor {
    /// Attract loop. `lines` is the item name wrapped for the centre circle.
    Idle {
        item_id: Option<ItemId>,
        lines: Vec<String>,
        colour: Rgb565,
    },
    Grid {
        cells: Vec<GridCell>,
        page: String,
        stale: bool,
    },
    Confirm {
        item_id: ItemId,
        name: String,
    },
    Result {
        item_id: ItemId,
        name: String,
        category: Category,
        is_dirty: bool,
        colour: Rgb565,
    },
    Search {
        query: String,
        /// The visible part of the result list.
        results: Vec<String>,
        total: usize,
    },
    /// No catalog could be loaded from any source.
    Unavailable { message: String },
}

pub trait Renderer {
    fn show_screen(&mut self, screen: &ScreenDescriptor) -> Result<()>;

    /// Shows a transient status line over the current screen.
    fn show_message(&mut self, text: &str) -> Result<()>;
}
