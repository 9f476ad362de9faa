// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Offline store engine.
//!
//! The [`OfflineStore`] orchestrates the three injected capabilities:
//! - the remote data service (network),
//! - the in-memory index (session working set),
//! - the durable store (crash/reload survival).
//!
//! It owns the online/offline mode flag and all record flag mutation; the
//! storage capabilities are passive.
//!
//! # Lifecycle
//!
//! ```text
//! new → start (rehydrate durable entries, initial sync) → get/put/query
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use offline_store::{OfflineStore, OrderedMemoryIndex, BoundedDurableStore, StoreConfig};
//!
//! let config = StoreConfig::new("orders");
//! let index = Arc::new(OrderedMemoryIndex::new(&config.identity_key));
//! let durable = Arc::new(BoundedDurableStore::new(64 * 1024));
//! let store = OfflineStore::new(config, remote, index, durable);
//! store.start().await?;
//! ```

mod api;
mod sync;
mod types;

pub use types::{PutOptions, StoreError, SyncReport};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::config::StoreConfig;
use crate::record::Record;
use crate::remote::RemoteService;
use crate::storage::traits::{DurableStore, MemoryIndex};

/// Offline-aware store engine.
///
/// Reads consult the in-memory index first and escalate to the remote service
/// only for outdated records while online; writes are mirrored to durable
/// storage and reconciled with the server by [`sync`](Self::sync). Any remote
/// failure flips the store offline; it comes back online only through
/// [`make_online`](Self::make_online).
pub struct OfflineStore {
    name: String,
    identity_key: String,
    online: Arc<AtomicBool>,
    remote: Arc<dyn RemoteService>,
    index: Arc<dyn MemoryIndex>,
    durable: Arc<dyn DurableStore>,
    /// Held for the duration of a sync pass so passes never run in parallel.
    sync_guard: Mutex<()>,
}

impl OfflineStore {
    /// Create an engine over the three injected capabilities.
    ///
    /// No I/O happens here; call [`start`](Self::start) to rehydrate from
    /// durable storage and attempt the initial sync.
    #[must_use]
    pub fn new(
        config: StoreConfig,
        remote: Arc<dyn RemoteService>,
        index: Arc<dyn MemoryIndex>,
        durable: Arc<dyn DurableStore>,
    ) -> Self {
        crate::metrics::set_mode(config.is_online);
        Self {
            name: config.name,
            identity_key: config.identity_key,
            online: Arc::new(AtomicBool::new(config.is_online)),
            remote,
            index,
            durable,
            sync_guard: Mutex::new(()),
        }
    }

    /// Rehydrate the in-memory index from durable storage, then run the
    /// initial sync pass.
    ///
    /// Durable entries are selected by key *containing* the store name;
    /// entries that fail to parse are logged and skipped.
    #[tracing::instrument(skip(self), fields(name = %self.name))]
    pub async fn start(&self) -> Result<SyncReport, StoreError> {
        let entries = self.durable.scan(&self.name).await?;
        let mut records = Vec::with_capacity(entries.len());
        for (key, payload) in entries {
            match serde_json::from_str::<Record>(&payload) {
                Ok(record) => records.push(record),
                Err(error) => {
                    warn!(%error, key = %key, "skipping unparseable durable entry");
                }
            }
        }
        info!(rehydrated = records.len(), "working set rehydrated from durable storage");
        self.index.load_all(records);
        Ok(self.sync().await)
    }

    /// The store name used as the durable key prefix.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current engine mode.
    #[must_use]
    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::Acquire)
    }

    /// Switch to offline mode. Idempotent; no side effects beyond the flag.
    pub fn make_offline(&self) {
        go_offline(&self.online);
    }

    /// Switch to online mode and attempt to reconcile local changes.
    ///
    /// Idempotent; when two callers race, one of them runs the sync pass and
    /// the other observes an empty report.
    pub async fn make_online(&self) -> SyncReport {
        if !self.online.swap(true, Ordering::AcqRel) {
            info!("store is back online");
            crate::metrics::set_mode(true);
        }
        self.sync().await
    }

    fn durable_key(&self, identity: &str) -> String {
        format!("{}-{}", self.name, identity)
    }
}

/// Flip the shared mode flag to offline, once.
///
/// Free function so detached remote-write tasks can flip the mode without
/// holding the engine itself.
fn go_offline(online: &AtomicBool) {
    if online.swap(false, Ordering::AcqRel) {
        warn!("store went offline");
        crate::metrics::set_mode(false);
        crate::metrics::record_mode_flip();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;

    use crate::query::{Filter, QueryOptions};
    use crate::remote::{RemoteError, RemoteService};
    use crate::storage::{BoundedDurableStore, DurableStore, OrderedMemoryIndex};

    /// Remote that fails every call, as if the network were down.
    struct DeadRemote;

    #[async_trait]
    impl RemoteService for DeadRemote {
        async fn fetch(&self, _id: &str) -> Result<Record, RemoteError> {
            Err(RemoteError::Unavailable("no route".into()))
        }

        async fn write(
            &self,
            _record: &Record,
            _options: &PutOptions,
        ) -> Result<Record, RemoteError> {
            Err(RemoteError::Unavailable("no route".into()))
        }

        async fn query(
            &self,
            _filter: &Filter,
            _options: &QueryOptions,
        ) -> Result<Vec<Record>, RemoteError> {
            Err(RemoteError::Unavailable("no route".into()))
        }
    }

    fn dead_store(config: StoreConfig) -> OfflineStore {
        OfflineStore::new(
            config,
            Arc::new(DeadRemote),
            Arc::new(OrderedMemoryIndex::new("id")),
            Arc::new(BoundedDurableStore::new(64 * 1024)),
        )
    }

    #[test]
    fn test_initial_mode_from_config() {
        let store = dead_store(StoreConfig::new("t"));
        assert!(store.is_online());

        let mut offline_config = StoreConfig::new("t");
        offline_config.is_online = false;
        let store = dead_store(offline_config);
        assert!(!store.is_online());
    }

    #[test]
    fn test_make_offline_is_idempotent() {
        let store = dead_store(StoreConfig::new("t"));
        store.make_offline();
        store.make_offline();
        assert!(!store.is_online());
    }

    #[tokio::test]
    async fn test_make_online_with_nothing_dirty() {
        let store = dead_store(StoreConfig::new("t"));
        store.make_offline();

        let report = store.make_online().await;
        assert!(store.is_online());
        assert_eq!(report.pending, 0);
        assert!(report.completed());
    }

    #[tokio::test]
    async fn test_start_with_empty_durable_storage() {
        let store = dead_store(StoreConfig::new("t"));
        let report = store.start().await.unwrap();
        assert_eq!(report.pending, 0);
    }

    #[tokio::test]
    async fn test_start_rehydrates_matching_entries() {
        let durable = Arc::new(BoundedDurableStore::new(64 * 1024));
        durable
            .write("tasks-1", r#"{"outdated":false,"modified":false,"removed":false,"id":1}"#)
            .await
            .unwrap();
        durable.write("other-9", r#"{"id":9}"#).await.unwrap();
        durable.write("tasks-bad", "{not json").await.unwrap();

        let index = Arc::new(OrderedMemoryIndex::new("id"));
        let mut config = StoreConfig::new("tasks");
        config.is_online = false;
        let store = OfflineStore::new(config, Arc::new(DeadRemote), index, durable);
        store.start().await.unwrap();

        assert!(store.get("1").await.is_some());
        assert!(store.get("9").await.is_none());
    }

    #[tokio::test]
    async fn test_rehydration_matches_substring_not_prefix() {
        // Key filtering is a contains() match on the store name, so entries
        // from a differently-prefixed namespace that embed the name are
        // picked up too.
        let durable = Arc::new(BoundedDurableStore::new(64 * 1024));
        durable.write("old-tasks-3", r#"{"id":3}"#).await.unwrap();

        let mut config = StoreConfig::new("tasks");
        config.is_online = false;
        let store = OfflineStore::new(
            config,
            Arc::new(DeadRemote),
            Arc::new(OrderedMemoryIndex::new("id")),
            durable,
        );
        store.start().await.unwrap();

        assert!(store.get("3").await.is_some());
    }

    #[tokio::test]
    async fn test_rehydrated_flags_survive_reload() {
        let durable = Arc::new(BoundedDurableStore::new(64 * 1024));
        let mut record = Record::from_value(json!({"id": 5, "val": "x"})).unwrap();
        record.modified = true;
        record.removed = true;
        durable
            .write("tasks-5", &serde_json::to_string(&record).unwrap())
            .await
            .unwrap();

        let mut config = StoreConfig::new("tasks");
        config.is_online = false;
        let store = OfflineStore::new(
            config,
            Arc::new(DeadRemote),
            Arc::new(OrderedMemoryIndex::new("id")),
            durable,
        );
        store.start().await.unwrap();

        let loaded = store.get("5").await.unwrap();
        assert_eq!(loaded, record);
    }
}
