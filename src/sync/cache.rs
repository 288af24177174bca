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

//! Local catalog cache file.
//!
//! The most recent successful remote catalog is written here so the kiosk can
//! keep working when the service cannot be reached. The same format is used
//! for the optional seed catalog shipped with the device.

use std::{fs, io, path::Path};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    model::{Category, Item, ItemId},
    theme::Theme,
};

#[derive(Debug, Serialize, Deserialize)]
struct CacheFile {
    #[serde(default)]
    items: Vec<CachedItem>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CachedItem {
    id: ItemId,
    name: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    color: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    can_be_dirty: bool,
    #[serde(default)]
    is_dirty: bool,
}

impl From<&Item> for CachedItem {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            category: item.category.as_str().to_owned(),
            color: Theme::to_hex(item.color),
            description: item.description.clone(),
            can_be_dirty: item.can_be_dirty,
            is_dirty: item.is_dirty,
        }
    }
}

impl From<CachedItem> for Item {
    fn from(cached: CachedItem) -> Self {
        let category = Category::parse(&cached.category);
        Self {
            id: cached.id,
            name: cached.name,
            category,
            color: Theme::from_hex(&cached.color)
                .unwrap_or_else(|| Theme::default().category_colour(category)),
            is_dirty: cached.is_dirty,
            can_be_dirty: cached.can_be_dirty,
            description: cached.description,
        }
    }
}

/// Reads a catalog file.
///
/// Returns `None` when the file is missing or cannot be parsed; a corrupt
/// cache is treated as no cache at all.
pub fn load(path: &Path) -> Option<Vec<Item>> {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) => {
            if e.kind() != io::ErrorKind::NotFound {
                warn!("Failed to read catalog file {}: {}", path.display(), e);
            }
            return None;
        }
    };

    match serde_json::from_str::<CacheFile>(&data) {
        Ok(file) => {
            let items: Vec<Item> = file.items.into_iter().map(Item::from).collect();
            debug!("Loaded {} items from {}", items.len(), path.display());
            Some(items)
        }
        Err(e) => {
            warn!("Ignoring corrupt catalog file {}: {}", path.display(), e);
            None
        }
    }
}

/// Writes a catalog file, replacing any previous contents.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the file cannot be
/// written.
pub fn save(path: &Path, items: &[Item]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = CacheFile {
        items: items.iter().map(CachedItem::from).collect(),
    };
    fs::write(path, serde_json::to_string(&file)?)?;
    Ok(())
}
