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

//! Catalog synchronization.
//!
//! This module keeps the kiosk's catalog in step with the remote service and
//! makes sure interactions are not lost while the network is unreliable.
//!
//! # Fallback chain
//!
//! A catalog fetch tries, in order, the remote service, the local cache file
//! (or the seed catalog when there is no usable cache), and finally the
//! built-in items. The first source yielding at least one item wins.
//!
//! # Pending interactions
//!
//! Posts that fail, or are made while offline, are appended to a queue file.
//! [`CatalogSyncService::flush_pending`] replays the queue in order and only
//! removes it once every entry has been accepted. Without a storage directory
//! nothing is cached and failed posts are dropped.

pub mod api;
pub mod cache;
pub mod defaults;
pub mod link;
pub mod wire;

use std::path::{Path, PathBuf};

use log::{debug, error, info, warn};

use crate::{
    error::{Result, SyncError},
    model::{
        CatalogSnapshot, Item, Provenance,
        queue::{self, PendingInteraction},
    },
    sync::{api::CatalogApi, link::NetworkLink, wire::StatusResponse},
};

const CACHE_FILE: &str = "catalog_cache.json";
const QUEUE_FILE: &str = "pending_posts.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostOutcome {
    /// Accepted by the service. `server_queued` is set when the service had
    /// to queue it on its side.
    Sent { server_queued: bool },
    /// Stored locally for a later flush.
    Queued,
    /// Could neither be sent nor stored.
    Dropped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlushOutcome {
    /// Entries accepted by the service during this flush.
    pub sent: usize,
    /// Entries still queued afterwards.
    pub remaining: usize,
}

impl FlushOutcome {
    pub fn is_complete(&self) -> bool {
        self.remaining == 0
    }
}

/// What the kiosk knows about its connection and the data it is showing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Connectivity {
    pub online: bool,
    pub provenance: Option<Provenance>,
    pub stale: bool,
    pub last_updated: Option<String>,
    pub pending_count: usize,
    pub database_online: Option<bool>,
    pub server_pending_count: Option<u32>,
}

pub struct CatalogSyncService {
    api: Box<dyn CatalogApi>,
    link: Box<dyn NetworkLink>,
    storage_dir: Option<PathBuf>,
    seed_catalog: Option<PathBuf>,
    builtin: Vec<Item>,
    connectivity: Connectivity,
}

impl CatalogSyncService {
    pub fn new(
        api: Box<dyn CatalogApi>,
        link: Box<dyn NetworkLink>,
        storage_dir: Option<PathBuf>,
    ) -> Self {
        let mut service = Self {
            api,
            link,
            storage_dir,
            seed_catalog: None,
            builtin: defaults::builtin_items(),
            connectivity: Connectivity::default(),
        };
        service.connectivity.pending_count = service.load_queue().map_or(0, |q| q.len());
        service
    }

    pub fn with_seed_catalog(mut self, path: Option<PathBuf>) -> Self {
        self.seed_catalog = path;
        self
    }

    /// Replaces the built-in items of the last fallback tier.
    pub fn with_builtin_items(mut self, items: Vec<Item>) -> Self {
        self.builtin = items;
        self
    }

    pub fn cache_path(&self) -> Option<PathBuf> {
        self.storage_dir.as_ref().map(|dir| dir.join(CACHE_FILE))
    }

    pub fn queue_path(&self) -> Option<PathBuf> {
        self.storage_dir.as_ref().map(|dir| dir.join(QUEUE_FILE))
    }

    /// Loads the best catalog currently available.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::CatalogUnavailable`] when every tier of the
    /// fallback chain is empty.
    pub fn fetch_catalog(&mut self) -> Result<CatalogSnapshot> {
        let snapshot = match self.fetch_remote() {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!("Remote catalog unavailable: {}", e);
                None
            }
        };

        let snapshot = snapshot
            .or_else(|| {
                self.load_local().map(|items| {
                    info!("Using {} items from local file", items.len());
                    CatalogSnapshot::new(items, Provenance::LocalFile, true)
                })
            })
            .or_else(|| {
                (!self.builtin.is_empty()).then(|| {
                    warn!("Using built-in catalog");
                    CatalogSnapshot::new(self.builtin.clone(), Provenance::BuiltIn, true)
                })
            });

        let Some(snapshot) = snapshot else {
            error!("No catalog available from any source");
            return Err(SyncError::CatalogUnavailable);
        };

        self.connectivity.provenance = Some(snapshot.provenance);
        self.connectivity.stale = snapshot.stale;
        self.connectivity.last_updated = snapshot.last_updated.clone();
        Ok(snapshot)
    }

    fn fetch_remote(&mut self) -> Result<CatalogSnapshot> {
        if !self.link.is_connected() {
            return Err(SyncError::Offline);
        }

        let response = self.api.fetch_items()?;
        let items = response.decode_items();
        if items.is_empty() {
            return Err(SyncError::Malformed("service returned no items".into()));
        }

        let (provenance, stale) = if response.is_cached() {
            info!(
                "Service is serving cached data from {}",
                response.last_updated.as_deref().unwrap_or("an unknown time")
            );
            (Provenance::RemoteCache, true)
        } else {
            (Provenance::Remote, false)
        };
        info!("Fetched {} items ({})", items.len(), provenance.as_str());

        if let Some(path) = self.cache_path() {
            if let Err(e) = cache::save(&path, &items) {
                warn!("Failed to write catalog cache: {}", e);
            }
        }

        Ok(CatalogSnapshot::new(items, provenance, stale).with_last_updated(response.last_updated))
    }

    fn load_local(&self) -> Option<Vec<Item>> {
        [self.cache_path(), self.seed_catalog.clone()]
            .into_iter()
            .flatten()
            .filter_map(|path| cache::load(&path))
            .find(|items| !items.is_empty())
    }

    /// Reports an item selection to the service, queueing it on failure.
    pub fn post_interaction(&mut self, location: &str, item_name: &str, dirty: bool) -> PostOutcome {
        if self.link.is_connected() {
            match self.api.post_interaction(location, item_name, dirty) {
                Ok(response) => {
                    if response.is_queued() {
                        info!("Service queued the post for {}", item_name);
                    }
                    return PostOutcome::Sent {
                        server_queued: response.is_queued(),
                    };
                }
                Err(e) => warn!("Post for {} failed: {}", item_name, e),
            }
        } else {
            debug!("Offline, queueing post for {}", item_name);
        }

        self.enqueue(PendingInteraction::new(location, item_name, dirty))
    }

    fn enqueue(&mut self, post: PendingInteraction) -> PostOutcome {
        let Some(path) = self.queue_path() else {
            warn!("No storage available, dropping post for {}", post.item);
            return PostOutcome::Dropped;
        };

        let result = read_queue(&path).and_then(|mut posts| {
            posts.push(post);
            queue::save(&path, &posts)?;
            Ok(posts.len())
        });

        match result {
            Ok(count) => {
                self.connectivity.pending_count = count;
                PostOutcome::Queued
            }
            Err(e) => {
                warn!("Failed to queue post: {}", e);
                PostOutcome::Dropped
            }
        }
    }

    /// Replays queued posts in the order they were made.
    ///
    /// Stops at the first failure, leaving the whole queue in place; entries
    /// sent before the failure will be sent again by the next flush.
    pub fn flush_pending(&mut self) -> FlushOutcome {
        let Some(path) = self.queue_path() else {
            return FlushOutcome::default();
        };
        let posts = match read_queue(&path) {
            Ok(posts) => posts,
            Err(e) => {
                warn!("Cannot read pending posts: {}", e);
                return FlushOutcome::default();
            }
        };
        if posts.is_empty() {
            return FlushOutcome::default();
        }

        if !self.link.is_connected() {
            return FlushOutcome {
                sent: 0,
                remaining: posts.len(),
            };
        }

        info!("Flushing {} pending posts", posts.len());
        for (sent, post) in posts.iter().enumerate() {
            if let Err(e) = self.api.post_interaction(&post.location, &post.item, post.dirty) {
                warn!("Flush stopped after {} of {} posts: {}", sent, posts.len(), e);
                return FlushOutcome {
                    sent,
                    remaining: posts.len(),
                };
            }
        }

        if let Err(e) = queue::clear(&path) {
            warn!("Failed to clear pending posts: {}", e);
            return FlushOutcome {
                sent: posts.len(),
                remaining: posts.len(),
            };
        }
        self.connectivity.pending_count = 0;

        FlushOutcome {
            sent: posts.len(),
            remaining: 0,
        }
    }

    /// Queries the service's own health.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Offline`] when the link is down, or the request
    /// error.
    pub fn check_status(&mut self) -> Result<StatusResponse> {
        if !self.link.is_connected() {
            return Err(SyncError::Offline);
        }
        let status = self.api.status()?;
        debug!(
            "Service status: database {}, {} pending",
            if status.database_online { "online" } else { "offline" },
            status.pending_posts_count
        );
        self.connectivity.database_online = Some(status.database_online);
        self.connectivity.server_pending_count = Some(status.pending_posts_count);
        Ok(status)
    }

    /// Polls the network link. Returns the new state when it changed since
    /// the previous poll.
    pub fn refresh_link(&mut self) -> Option<bool> {
        let online = self.link.is_connected();
        if online == self.connectivity.online {
            return None;
        }
        info!("Network link is {}", if online { "up" } else { "down" });
        self.connectivity.online = online;
        Some(online)
    }

    pub fn connectivity(&self) -> &Connectivity {
        &self.connectivity
    }

    fn load_queue(&self) -> Option<Vec<PendingInteraction>> {
        let path = self.queue_path()?;
        queue::load(&path).ok()
    }

    pub fn pending(&self) -> Vec<PendingInteraction> {
        self.load_queue().unwrap_or_default()
    }

    pub fn storage_dir(&self) -> Option<&Path> {
        self.storage_dir.as_deref()
    }
}

/// Loads the queue file, setting an unparseable one aside and starting a
/// fresh queue in its place.
fn read_queue(path: &Path) -> Result<Vec<PendingInteraction>> {
    match queue::load(path) {
        Err(SyncError::Malformed(e)) => {
            match queue::quarantine(path) {
                Ok(moved) => warn!("Pending posts were corrupt ({}), moved to {}", e, moved.display()),
                Err(err) => {
                    warn!("Pending posts were corrupt ({}), removing: {}", e, err);
                    queue::clear(path)?;
                }
            }
            Ok(vec![])
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use std::{
        cell::{Cell, RefCell},
        rc::Rc,
    };

    use super::{
        wire::{ItemsResponse, PostResponse},
        *,
    };

    #[derive(Default)]
    struct FakeState {
        items: Option<String>,
        fail_posts_after: Option<usize>,
        posts: Vec<(String, String, bool)>,
    }

    #[derive(Clone, Default)]
    struct FakeApi(Rc<RefCell<FakeState>>);

    impl CatalogApi for FakeApi {
        fn fetch_items(&self) -> Result<ItemsResponse> {
            match &self.0.borrow().items {
                Some(body) => Ok(serde_json::from_str(body)?),
                None => Err(SyncError::Network("timed out".into())),
            }
        }

        fn post_interaction(&self, location: &str, item: &str, dirty: bool) -> Result<PostResponse> {
            let mut state = self.0.borrow_mut();
            if state.fail_posts_after.is_some_and(|n| state.posts.len() >= n) {
                return Err(SyncError::HttpStatus(503));
            }
            state.posts.push((location.into(), item.into(), dirty));
            Ok(PostResponse::default())
        }

        fn status(&self) -> Result<StatusResponse> {
            Ok(StatusResponse {
                database_online: false,
                pending_posts_count: 2,
            })
        }
    }

    #[derive(Clone)]
    struct FakeLink(Rc<Cell<bool>>);

    impl NetworkLink for FakeLink {
        fn is_connected(&self) -> bool {
            self.0.get()
        }
    }

    fn service(dir: Option<PathBuf>, online: bool) -> (CatalogSyncService, FakeApi, Rc<Cell<bool>>) {
        let api = FakeApi::default();
        let up = Rc::new(Cell::new(online));
        let service = CatalogSyncService::new(
            Box::new(api.clone()),
            Box::new(FakeLink(Rc::clone(&up))),
            dir,
        );
        (service, api, up)
    }

    #[test]
    fn remote_catalog_is_cached() {
        let dir = tempfile::tempdir().unwrap();
        let (mut service, api, _) = service(Some(dir.path().into()), true);
        api.0.borrow_mut().items = Some(
            r#"{"source":"database","last_updated":"today","items":[[2,"b","paper",false],[1,"a","plastic",false]]}"#.into(),
        );

        let snapshot = service.fetch_catalog().unwrap();
        assert_eq!(snapshot.provenance, Provenance::Remote);
        assert!(!snapshot.stale);
        assert_eq!(snapshot.last_updated.as_deref(), Some("today"));
        assert_eq!(snapshot.items()[0].name, "a");

        let cached = cache::load(&service.cache_path().unwrap()).unwrap();
        assert_eq!(cached.len(), 2);
    }

    #[test]
    fn server_cache_is_marked_stale() {
        let (mut service, api, _) = service(None, true);
        api.0.borrow_mut().items = Some(r#"{"source":"cache","items":[[1,"a","plastic",false]]}"#.into());

        let snapshot = service.fetch_catalog().unwrap();
        assert_eq!(snapshot.provenance, Provenance::RemoteCache);
        assert!(snapshot.stale);
        assert!(service.connectivity().stale);
    }

    #[test]
    fn empty_remote_falls_through_to_builtin() {
        let (mut service, api, _) = service(None, true);
        api.0.borrow_mut().items = Some(r#"{"source":"database","items":[]}"#.into());

        let snapshot = service.fetch_catalog().unwrap();
        assert_eq!(snapshot.provenance, Provenance::BuiltIn);
        assert_eq!(snapshot.len(), 4);
    }

    #[test]
    fn seed_file_is_used_without_cache() {
        let dir = tempfile::tempdir().unwrap();
        let seed = dir.path().join("seed.json");
        cache::save(&seed, &[Item::new(9, "Jar", crate::model::Category::Waste)]).unwrap();

        let (service, _, _) = service(Some(dir.path().join("state")), false);
        let mut service = service.with_seed_catalog(Some(seed));

        let snapshot = service.fetch_catalog().unwrap();
        assert_eq!(snapshot.provenance, Provenance::LocalFile);
        assert_eq!(snapshot.items()[0].id, 9);
    }

    #[test]
    fn nothing_anywhere_is_unavailable() {
        let (service, _, _) = service(None, false);
        let mut service = service.with_builtin_items(vec![]);
        assert!(matches!(
            service.fetch_catalog(),
            Err(SyncError::CatalogUnavailable)
        ));
    }

    #[test]
    fn offline_posts_are_queued_then_flushed_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let (mut service, api, up) = service(Some(dir.path().into()), false);

        assert_eq!(service.post_interaction("hall", "Can", false), PostOutcome::Queued);
        assert_eq!(service.post_interaction("hall", "Box", true), PostOutcome::Queued);
        assert_eq!(service.connectivity().pending_count, 2);

        up.set(true);
        let outcome = service.flush_pending();
        assert_eq!(outcome, FlushOutcome { sent: 2, remaining: 0 });
        assert!(service.pending().is_empty());
        assert_eq!(service.connectivity().pending_count, 0);

        let posts = &api.0.borrow().posts;
        assert_eq!(posts[0], ("hall".into(), "Can".into(), false));
        assert_eq!(posts[1], ("hall".into(), "Box".into(), true));
    }

    #[test]
    fn partial_flush_keeps_the_whole_queue() {
        let dir = tempfile::tempdir().unwrap();
        let (mut service, api, up) = service(Some(dir.path().into()), false);
        for name in ["a", "b", "c"] {
            service.post_interaction("hall", name, false);
        }

        up.set(true);
        api.0.borrow_mut().fail_posts_after = Some(1);
        let outcome = service.flush_pending();
        assert_eq!(outcome, FlushOutcome { sent: 1, remaining: 3 });
        assert!(!outcome.is_complete());
        assert_eq!(service.pending().len(), 3);
    }

    #[test]
    fn corrupt_queue_is_set_aside_and_posts_still_queue() {
        let dir = tempfile::tempdir().unwrap();
        let queue_file = dir.path().join(QUEUE_FILE);
        std::fs::write(&queue_file, r#"{"posts": [ trunc"#).unwrap();
        let (mut service, api, up) = service(Some(dir.path().into()), false);

        let outcomes: Vec<PostOutcome> = ["Can", "Paper", "Apple"]
            .into_iter()
            .map(|item| service.post_interaction("hall", item, false))
            .collect();
        assert_eq!(outcomes, vec![PostOutcome::Queued; 3]);
        assert_eq!(service.connectivity().pending_count, 3);
        assert!(dir.path().join("pending_posts.json.corrupt").exists());

        up.set(true);
        assert_eq!(
            service.flush_pending(),
            FlushOutcome {
                sent: 3,
                remaining: 0
            }
        );
        assert_eq!(api.0.borrow().posts.len(), 3);
    }

    #[test]
    fn corrupt_queue_does_not_block_flush() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(QUEUE_FILE), "{ not json").unwrap();
        let (mut service, _, _) = service(Some(dir.path().into()), true);

        assert_eq!(service.flush_pending(), FlushOutcome::default());
        assert_eq!(
            service.post_interaction("hall", "Can", false),
            PostOutcome::Sent {
                server_queued: false
            }
        );
        assert!(!dir.path().join(QUEUE_FILE).exists());
    }

    #[test]
    fn failed_post_without_storage_is_dropped() {
        let (mut service, _, _) = service(None, false);
        assert_eq!(service.post_interaction("hall", "Can", false), PostOutcome::Dropped);
        assert_eq!(service.flush_pending(), FlushOutcome::default());
    }

    #[test]
    fn link_changes_are_reported_once() {
        let (mut service, _, up) = service(None, false);
        assert_eq!(service.refresh_link(), None);
        up.set(true);
        assert_eq!(service.refresh_link(), Some(true));
        assert_eq!(service.refresh_link(), None);
        assert!(service.connectivity().online);
    }

    #[test]
    fn status_is_recorded() {
        let (mut service, _, up) = service(None, false);
        assert!(matches!(service.check_status(), Err(SyncError::Offline)));

        up.set(true);
        service.check_status().unwrap();
        assert_eq!(service.connectivity().database_online, Some(false));
        assert_eq!(service.connectivity().server_pending_count, Some(2));
    }
}
