//! # Offline Store
//!
//! A client-side data cache that transparently switches between a remote data
//! service and a local persisted cache, so an application keeps working
//! (reads and writes) while the network is down and reconciles local changes
//! with the server once connectivity returns.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       OfflineStore                          │
//! │  • Online/offline mode switch (auto-flip on remote failure) │
//! │  • Record flags: outdated / modified / removed              │
//! │  • get / put / query dispatch, sync pass, purge policy      │
//! └─────────────────────────────────────────────────────────────┘
//!        │                    │                     │
//!        ▼                    ▼                     ▼
//! ┌──────────────┐   ┌─────────────────┐   ┌─────────────────┐
//! │ RemoteService│   │   MemoryIndex   │   │  DurableStore   │
//! │  (network)   │   │ (working set,   │   │ (bounded crash/ │
//! │ fetch/write/ │   │  insertion-     │   │  reload mirror, │
//! │ query        │   │  ordered)       │   │  FIFO purge)    │
//! └──────────────┘   └─────────────────┘   └─────────────────┘
//! ```
//!
//! Reads consult the memory index first and escalate to the remote service
//! only for records held as outdated while online. Writes always land in the
//! memory index and are mirrored to durable storage; online they are also
//! sent to the server on a detached task, offline they are marked `modified`
//! and reconciled by the next sync pass. Any remote failure flips the store
//! offline; [`OfflineStore::make_online`] flips it back and syncs.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use offline_store::{
//!     BoundedDurableStore, Filter, OfflineStore, OrderedMemoryIndex, PutOptions,
//!     QueryOptions, Record, StoreConfig,
//! };
//! use serde_json::json;
//!
//! let config = StoreConfig::new("orders");
//! let store = OfflineStore::new(
//!     config.clone(),
//!     Arc::new(my_remote),                                  // impl RemoteService
//!     Arc::new(OrderedMemoryIndex::new(&config.identity_key)),
//!     Arc::new(BoundedDurableStore::new(256 * 1024)),
//! );
//!
//! // Rehydrate from durable storage and attempt the initial sync.
//! store.start().await?;
//!
//! let record = Record::from_value(json!({"id": 1, "status": "open"}))?;
//! store.put(record, PutOptions::default()).await?;
//!
//! // Works the same whether the network is up or not.
//! let held = store.get("1").await;
//! let open = store
//!     .query(&Filter::new().field("status", json!("open")), &QueryOptions::default())
//!     .await;
//! ```
//!
//! ## Modules
//!
//! - [`engine`]: the [`OfflineStore`] orchestrating the three capabilities
//! - [`remote`]: the remote data-service trait
//! - [`storage`]: memory-index and durable-store traits plus default impls
//! - [`record`]: the flagged record type
//! - [`query`]: filters and result windowing

pub mod config;
pub mod engine;
pub mod metrics;
pub mod query;
pub mod record;
pub mod remote;
pub mod storage;

pub use config::StoreConfig;
pub use engine::{OfflineStore, PutOptions, StoreError, SyncReport};
pub use query::{Filter, QueryOptions};
pub use record::Record;
pub use remote::{RemoteError, RemoteService};
pub use storage::{
    BoundedDurableStore, DurableError, DurableStore, MemoryIndex, OrderedMemoryIndex,
};
