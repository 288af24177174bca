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

//! Pending interaction queue.
//!
//! Interactions that could not be posted are kept here, in order, until the
//! catalog service accepts the whole batch.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingInteraction {
    pub location: String,
    pub item: String,
    pub dirty: bool,
    pub timestamp: DateTime<Utc>,
}

impl PendingInteraction {
    pub fn new(location: &str, item: &str, dirty: bool) -> Self {
        Self {
            location: location.to_owned(),
            item: item.to_owned(),
            dirty,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct QueueFile {
    #[serde(default)]
    posts: Vec<PendingInteraction>,
}

/// Reads the queue file. A missing file is an empty queue.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load(path: &Path) -> Result<Vec<PendingInteraction>> {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(vec![]),
        Err(e) => return Err(e.into()),
    };
    let file: QueueFile = serde_json::from_str(&data)?;
    Ok(file.posts)
}

/// Writes the queue file, replacing any previous contents.
///
/// The new contents go to a sibling temporary file that is then renamed over
/// the queue, so an interrupted write leaves the previous queue intact.
pub fn save(path: &Path, posts: &[PendingInteraction]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = QueueFile {
        posts: posts.to_vec(),
    };
    let staging = sibling(path, "tmp");
    fs::write(&staging, serde_json::to_string_pretty(&file)?)?;
    fs::rename(&staging, path)?;
    Ok(())
}

/// Moves an unreadable queue file out of the way, returning where it went.
pub fn quarantine(path: &Path) -> Result<PathBuf> {
    let target = sibling(path, "corrupt");
    fs::rename(path, &target)?;
    Ok(target)
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

/// Removes the queue file. A missing file is not an error.
pub fn clear(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
        _ => Ok(()),
    }
}
