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

//! Payloads exchanged with the catalog service.

use log::warn;
use serde::Deserialize;
use serde_json::Value;

use crate::{
    model::{Category, Item, ItemId},
    theme::Theme,
};

/// Body of `GET /items`.
#[derive(Debug, Deserialize)]
pub struct ItemsResponse {
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub items: Vec<Value>,
}

impl ItemsResponse {
    /// Whether the service answered from its own cache rather than its
    /// database.
    pub fn is_cached(&self) -> bool {
        self.source.as_deref() == Some("cache")
    }

    /// Decodes the items, skipping any entry that is malformed.
    pub fn decode_items(&self) -> Vec<Item> {
        self.items
            .iter()
            .filter_map(|value| match WireItem::from_value(value) {
                Ok(item) => Some(item.into_item()),
                Err(e) => {
                    warn!("Skipping malformed item {}: {}", value, e);
                    None
                }
            })
            .collect()
    }
}

/// Body of `POST /sentData/...`.
#[derive(Debug, Default, Deserialize)]
pub struct PostResponse {
    #[serde(default)]
    pub source: Option<String>,
}

impl PostResponse {
    /// The service accepted the post but could not store it yet.
    pub fn is_queued(&self) -> bool {
        self.source.as_deref() == Some("queued")
    }
}

/// Body of `GET /status`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub database_online: bool,
    #[serde(default)]
    pub pending_posts_count: u32,
}

/// An item as the service sends it: either a `[id, name, category, dirty]`
/// tuple or an object.
#[derive(Debug)]
enum WireItem {
    Tuple(ItemId, String, String, bool),
    Record(WireRecord),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireRecord {
    id: ItemId,
    name: String,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    dirty: bool,
    #[serde(default = "default_can_be_dirty")]
    can_be_dirty: bool,
    #[serde(default)]
    description: String,
}

fn default_can_be_dirty() -> bool {
    true
}

impl WireItem {
    fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        match value {
            Value::Array(_) => {
                let (id, name, category, dirty) = Deserialize::deserialize(value)?;
                Ok(WireItem::Tuple(id, name, category, dirty))
            }
            Value::Object(_) => Ok(WireItem::Record(WireRecord::deserialize(value)?)),
            other => Err(serde::de::Error::custom(format!(
                "expected an array or object, found {}",
                other
            ))),
        }
    }

    fn into_item(self) -> Item {
        let (id, name, category, dirty, can_be_dirty, description) = match self {
            WireItem::Tuple(id, name, category, dirty) => {
                (id, name, Some(category), dirty, true, String::new())
            }
            WireItem::Record(r) => (
                r.id,
                r.name,
                r.category,
                r.dirty,
                r.can_be_dirty,
                r.description,
            ),
        };
        let category = category
            .as_deref()
            .map(Category::parse)
            .unwrap_or(Category::Waste);

        Item {
            id,
            name,
            category,
            color: Theme::default().category_colour(category),
            is_dirty: dirty,
            can_be_dirty,
            description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tuples_and_objects_decode() {
        let response: ItemsResponse = serde_json::from_str(
            r#"{
                "source": "database",
                "last_updated": "2026-10-01 12:00",
                "items": [
                    [3, "Milk carton", "Papier", false],
                    {"id": 7, "name": "Crisp bag", "category": "rest", "canBeDirty": false,
                     "description": "Foil lined"},
                    {"id": 9, "name": "Apple core"}
                ]
            }"#,
        )
        .unwrap();

        assert!(!response.is_cached());
        let items = response.decode_items();
        assert_eq!(items.len(), 3);

        assert_eq!(items[0].category, Category::Paper);
        assert!(items[0].can_be_dirty);
        assert_eq!(items[0].color, 0x03BF);

        assert_eq!(items[1].category, Category::Waste);
        assert!(!items[1].can_be_dirty);
        assert_eq!(items[1].description, "Foil lined");

        assert_eq!(items[2].category, Category::Waste);
        assert!(items[2].can_be_dirty);
        assert!(!items[2].is_dirty);
    }

    #[test]
    fn malformed_entries_are_skipped_individually() {
        let response: ItemsResponse = serde_json::from_str(
            r#"{"source": "cache", "items": [
                [1, "Can", "plastic", false],
                "nonsense",
                [2, "Short"],
                {"name": "No id"},
                {"id": 4, "name": "Bottle", "category": "PLASTIC"}
            ]}"#,
        )
        .unwrap();

        assert!(response.is_cached());
        let ids: Vec<ItemId> = response.decode_items().iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 4]);
    }

    #[test]
    fn post_and_status_bodies() {
        let post: PostResponse = serde_json::from_str(r#"{"source":"queued"}"#).unwrap();
        assert!(post.is_queued());

        let status: StatusResponse =
            serde_json::from_str(r#"{"database_online":true,"pending_posts_count":3}"#).unwrap();
        assert_eq!(
            status,
            StatusResponse {
                database_online: true,
                pending_posts_count: 3
            }
        );
    }
}
