use async_trait::async_trait;
use thiserror::Error;

use crate::query::{Filter, QueryOptions};
use crate::record::Record;

#[derive(Error, Debug)]
pub enum DurableError {
    #[error("durable storage capacity exceeded")]
    CapacityExceeded,
    #[error("durable storage backend error: {0}")]
    Backend(String),
}

/// In-memory ordered working set of records for the current session.
///
/// The index is passive storage: it never sets record flags itself, and the
/// engine is its only writer. Iteration order of [`ordered_items`] is
/// insertion order; replacing an existing record keeps its position. That
/// ordering is what the purge policy's oldest-first selection relies on.
///
/// [`ordered_items`]: MemoryIndex::ordered_items
pub trait MemoryIndex: Send + Sync {
    /// Look up a record by identity.
    fn lookup(&self, id: &str) -> Option<Record>;

    /// Insert a record, or replace the record sharing its identity in place.
    fn upsert(&self, record: Record);

    /// All records matching `filter`, windowed by `options`.
    fn query(&self, filter: &Filter, options: &QueryOptions) -> Vec<Record>;

    /// Bulk rehydration; replaces the current working set.
    fn load_all(&self, records: Vec<Record>);

    /// The full working set in insertion order, oldest first.
    fn ordered_items(&self) -> Vec<Record>;

    /// Current record count.
    fn len(&self) -> usize;

    /// Check if the index holds no records.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Durable key-value persistence substrate with bounded capacity.
///
/// Used only for crash/reload survival; the engine mirrors accepted writes
/// here and rehydrates the memory index from it at startup.
#[async_trait]
pub trait DurableStore: Send + Sync {
    /// Persist a serialized record under `key`.
    ///
    /// Fails with [`DurableError::CapacityExceeded`] when the substrate is
    /// full; the engine responds by purging once and retrying once.
    async fn write(&self, key: &str, value: &str) -> Result<(), DurableError>;

    /// Remove the entry under `key`. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<(), DurableError>;

    /// All entries whose key contains `fragment`, as `(key, value)` pairs.
    /// Consumed once, at startup, to rehydrate the memory index.
    async fn scan(&self, fragment: &str) -> Result<Vec<(String, String)>, DurableError>;
}
