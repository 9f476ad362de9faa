//! Public types for the offline store engine.

use thiserror::Error;

use crate::record::Record;
use crate::storage::traits::DurableError;

/// Directives for a `put`, forwarded to the remote write.
#[derive(Debug, Clone, Default)]
pub struct PutOptions {
    /// Whether an existing server record may be overwritten. `None` leaves
    /// the choice to the remote service.
    pub overwrite: Option<bool>,
}

/// Failure surfaced by engine operations.
///
/// Remote failures never appear here; they flip the store offline instead.
/// The only runtime failure a `put` reports is durable persistence giving up
/// after the purge-and-retry, which leaves in-memory state intact.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("record has no usable '{0}' field to serve as its identity")]
    MissingIdentity(String),
    #[error("serializing record for durable storage failed: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error(transparent)]
    Durable(#[from] DurableError),
}

/// Result of a sync pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Dirty records in the snapshot taken at pass start.
    pub pending: usize,
    /// Records whose remote write succeeded.
    pub synced: usize,
    /// Records that failed to persist durably (remote write still counted).
    pub errors: usize,
    /// The pass stopped early because the store went offline.
    pub aborted: bool,
}

impl SyncReport {
    /// Check if every pending record was reconciled.
    #[must_use]
    pub fn completed(&self) -> bool {
        !self.aborted && self.errors == 0 && self.synced == self.pending
    }
}

/// How `put_impl` issues the remote write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum RemoteWrite {
    /// Fire-and-forget on a detached task; failures flip the mode later.
    Detached,
    /// Await completion so a failure aborts the enclosing sync pass.
    Awaited,
}

/// What a single `put_impl` call did (internal use).
#[derive(Debug, Clone)]
pub(super) struct PutOutcome {
    /// The record as stored, flags settled.
    pub record: Record,
    /// The durable write triggered a purge; the caller owes a sync pass.
    pub purged: bool,
    /// An awaited remote write failed and the store is now offline.
    pub remote_failed: bool,
}
