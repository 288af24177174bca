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

//! Domain models and core data structures.
//!
//! This module defines the central entities of the kiosk: the sortable items,
//! the waste categories they belong to, and the catalog snapshots that group
//! them together with a record of where they came from.

pub mod catalog;
pub mod queue;
pub mod search;

use crate::theme::{Rgb565, Theme};

pub type ItemId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Plastic,
    Paper,
    Green,
    Waste,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Plastic,
        Category::Paper,
        Category::Green,
        Category::Waste,
    ];

    /// Parses a category name as sent by the catalog service.
    ///
    /// Matching is case-insensitive and accepts the Dutch names used by older
    /// deployments. Anything unrecognised sorts as residual waste.
    pub fn parse(name: &str) -> Category {
        match name.trim().to_ascii_lowercase().as_str() {
            "plastic" => Category::Plastic,
            "paper" | "papier" => Category::Paper,
            "green" | "groen" | "gft" => Category::Green,
            _ => Category::Waste,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Plastic => "plastic",
            Category::Paper => "paper",
            Category::Green => "green",
            Category::Waste => "waste",
        }
    }

    /// Index of the LED strip that belongs to this category.
    pub fn channel(&self) -> usize {
        match self {
            Category::Plastic => 0,
            Category::Paper => 1,
            Category::Green => 2,
            Category::Waste => 3,
        }
    }

    pub fn from_channel(channel: usize) -> Option<Category> {
        Category::ALL.get(channel).copied()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub category: Category,
    pub color: Rgb565,
    pub is_dirty: bool,
    pub can_be_dirty: bool,
    pub description: String,
}

impl Item {
    /// Creates an item using the category's default colour.
    pub fn new(id: ItemId, name: impl Into<String>, category: Category) -> Self {
        Self {
            id,
            name: name.into(),
            category,
            color: Theme::default().category_colour(category),
            is_dirty: false,
            can_be_dirty: true,
            description: String::new(),
        }
    }

    pub fn with_can_be_dirty(mut self, can_be_dirty: bool) -> Self {
        self.can_be_dirty = can_be_dirty;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// The category the item should be disposed in, given its cleanliness.
    pub fn disposal_category(&self, is_dirty: bool) -> Category {
        if is_dirty { Category::Waste } else { self.category }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// Fresh data from the catalog service.
    Remote,
    /// Served by the catalog service from its own cache.
    RemoteCache,
    /// Read from the device's local cache or seed file.
    LocalFile,
    BuiltIn,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::Remote => "remote",
            Provenance::RemoteCache => "remote-cache",
            Provenance::LocalFile => "local-file",
            Provenance::BuiltIn => "built-in",
        }
    }
}

/// An immutable, name-sorted set of items together with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogSnapshot {
    items: Vec<Item>,
    pub provenance: Provenance,
    pub stale: bool,
    pub last_updated: Option<String>,
}

impl CatalogSnapshot {
    /// Builds a snapshot, sorting the items by name.
    pub fn new(mut items: Vec<Item>, provenance: Provenance, stale: bool) -> Self {
        items.sort_by_cached_key(|item| item.name.to_lowercase());
        Self {
            items,
            provenance,
            stale,
            last_updated: None,
        }
    }

    pub fn with_last_updated(mut self, last_updated: Option<String>) -> Self {
        self.last_updated = last_updated;
        self
    }

    pub fn empty() -> Self {
        Self::new(vec![], Provenance::BuiltIn, true)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub(crate) fn items_mut(&mut self) -> &mut [Item] {
        &mut self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parsing_accepts_aliases() {
        assert_eq!(Category::parse("Plastic"), Category::Plastic);
        assert_eq!(Category::parse("PAPIER"), Category::Paper);
        assert_eq!(Category::parse("gft"), Category::Green);
        assert_eq!(Category::parse("Groen"), Category::Green);
        assert_eq!(Category::parse("restafval"), Category::Waste);
        assert_eq!(Category::parse("rest"), Category::Waste);
        assert_eq!(Category::parse("glass"), Category::Waste);
    }

    #[test]
    fn channels_are_stable() {
        for (i, category) in Category::ALL.iter().enumerate() {
            assert_eq!(category.channel(), i);
            assert_eq!(Category::from_channel(i), Some(*category));
        }
        assert_eq!(Category::from_channel(4), None);
    }

    #[test]
    fn dirty_items_go_to_waste() {
        let item = Item::new(1, "Yoghurt cup", Category::Plastic);
        assert_eq!(item.disposal_category(false), Category::Plastic);
        assert_eq!(item.disposal_category(true), Category::Waste);
    }

    #[test]
    fn snapshot_sorts_case_insensitively() {
        let snapshot = CatalogSnapshot::new(
            vec![
                Item::new(1, "banana", Category::Green),
                Item::new(2, "Apple", Category::Green),
                Item::new(3, "can", Category::Plastic),
            ],
            Provenance::Remote,
            false,
        );
        let names: Vec<&str> = snapshot.items().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Apple", "banana", "can"]);
    }
}
