// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Reconciliation and durable persistence.
//!
//! The sync pass re-sends every dirty record to the server in index order;
//! the durable-put path mirrors records into bounded durable storage,
//! recovering from a full substrate with a single purge-and-retry.

use tracing::{debug, error, info, warn};

use crate::record::Record;
use crate::storage::traits::DurableError;

use super::types::{PutOptions, RemoteWrite, StoreError, SyncReport};
use super::OfflineStore;

impl OfflineStore {
    /// Reconcile all locally dirty records with the server.
    ///
    /// No-op when offline. The pass snapshots the index at start and re-puts
    /// each dirty record with the remote write awaited, so the first failure
    /// flips the store offline and aborts the remainder; records dirtied
    /// during the pass wait for the next one. This is the only path that
    /// sends `removed` records (as the record's final state) to the server.
    ///
    /// Passes never run in parallel: a call that finds one already running
    /// returns an empty report immediately.
    #[tracing::instrument(skip(self))]
    pub async fn sync(&self) -> SyncReport {
        let mut report = SyncReport::default();
        if !self.is_online() {
            return report;
        }
        let Ok(_guard) = self.sync_guard.try_lock() else {
            debug!("sync pass already running");
            return report;
        };

        let snapshot: Vec<Record> = self
            .index
            .ordered_items()
            .into_iter()
            .filter(|record| record.is_dirty())
            .collect();
        report.pending = snapshot.len();
        if snapshot.is_empty() {
            return report;
        }

        info!(pending = report.pending, "starting sync pass");
        crate::metrics::record_sync_items(report.pending);

        for record in snapshot {
            if !self.is_online() {
                report.aborted = true;
                break;
            }
            match self
                .put_impl(record, &PutOptions::default(), RemoteWrite::Awaited)
                .await
            {
                Ok(outcome) if outcome.remote_failed => {
                    report.aborted = true;
                    break;
                }
                Ok(_) => report.synced += 1,
                Err(error) => {
                    error!(%error, "record could not be persisted durably during sync");
                    report.errors += 1;
                }
            }
        }

        if report.aborted {
            warn!(
                synced = report.synced,
                pending = report.pending,
                "sync pass aborted, store is offline"
            );
        } else {
            debug!(synced = report.synced, "sync pass complete");
        }
        report
    }

    /// Mirror a record into durable storage under `"<name>-<identity>"`.
    ///
    /// On a full substrate: purge once, retry once. Returns whether a purge
    /// happened so the caller can trigger the follow-up sync pass. A failure
    /// on the retry is reported and surfaced, but in-memory state is already
    /// settled and unaffected.
    pub(super) async fn durable_put(
        &self,
        identity: &str,
        record: &Record,
    ) -> Result<bool, StoreError> {
        let key = self.durable_key(identity);
        let payload = serde_json::to_string(record)?;

        match self.durable.write(&key, &payload).await {
            Ok(()) => Ok(false),
            Err(DurableError::CapacityExceeded) => {
                warn!(key = %key, "durable storage full, purging oldest record");
                self.purge().await?;

                // Re-serialize from the index: the purge may have marked this
                // very record removed.
                let payload = match self.index.lookup(identity) {
                    Some(current) => serde_json::to_string(&current)?,
                    None => payload,
                };
                match self.durable.write(&key, &payload).await {
                    Ok(()) => Ok(true),
                    Err(error) => {
                        error!(%error, key = %key, "durable write failed again after purge");
                        crate::metrics::record_operation("durable_put", "error");
                        Err(error.into())
                    }
                }
            }
            Err(error) => {
                error!(%error, key = %key, "durable write failed");
                crate::metrics::record_operation("durable_put", "error");
                Err(error.into())
            }
        }
    }

    /// Evict the oldest record from durable storage.
    ///
    /// Strict FIFO: the record at index 0 of the ordered working set is
    /// marked `removed` and `modified` (so the next sync pass communicates
    /// the removal to the server) and its durable entry is deleted. The
    /// record stays in the in-memory index, visible to `get` and `query`.
    async fn purge(&self) -> Result<(), StoreError> {
        let Some(mut oldest) = self.index.ordered_items().into_iter().next() else {
            return Ok(());
        };
        let Some(identity) = oldest.identity(&self.identity_key) else {
            return Ok(());
        };

        oldest.removed = true;
        oldest.modified = true;
        self.index.upsert(oldest);
        self.durable.delete(&self.durable_key(&identity)).await?;

        info!(id = %identity, "purged oldest record from durable storage");
        crate::metrics::record_purge();
        Ok(())
    }
}
