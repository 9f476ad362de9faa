//! Core store operations: get, put, query.
//!
//! All three share the same failure posture: a remote failure is never
//! surfaced to the caller, it flips the store offline and the operation
//! resolves with the best locally available data.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, warn};

use crate::query::{Filter, QueryOptions};
use crate::record::Record;

use super::types::{PutOptions, PutOutcome, RemoteWrite, StoreError};
use super::{go_offline, OfflineStore};

impl OfflineStore {
    /// Get a record by identity.
    ///
    /// Resolves from the in-memory index unless the store is online and the
    /// held copy is outdated (and not pending removal), in which case a
    /// remote fetch refreshes it first. A fetch failure flips the store
    /// offline and the stale copy is returned instead; `get` never fails.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Option<Record> {
        let start = Instant::now();
        let held = self.index.lookup(id);

        let needs_refresh = self.is_online()
            && held
                .as_ref()
                .is_some_and(|record| record.outdated && !record.removed);
        if !needs_refresh {
            debug!(found = held.is_some(), "serving get from memory");
            crate::metrics::record_operation("get", if held.is_some() { "local" } else { "miss" });
            return held;
        }

        match self.remote.fetch(id).await {
            Ok(mut fetched) => {
                fetched.outdated = false;
                fetched.modified = false;
                self.index.upsert(fetched.clone());
                let purged = match self.durable_put(id, &fetched).await {
                    Ok(purged) => purged,
                    Err(error) => {
                        error!(%error, id, "refreshed record could not be mirrored durably");
                        false
                    }
                };
                debug!("record refreshed from remote");
                crate::metrics::record_operation("get", "refreshed");
                crate::metrics::record_latency("get", start.elapsed());
                if purged {
                    self.sync().await;
                }
                Some(fetched)
            }
            Err(error) => {
                warn!(%error, id, "remote fetch failed, falling back to held copy");
                self.make_offline();
                crate::metrics::record_operation("get", "stale");
                held
            }
        }
    }

    /// Put a record into the store.
    ///
    /// Online, the record's flags are cleared optimistically and the remote
    /// write is issued on a detached task; a background failure flips the
    /// store offline. Offline, the record is marked `modified` for the next
    /// sync pass. Either way the record lands in the in-memory index and is
    /// mirrored to durable storage before this returns.
    ///
    /// The only error surfaced is durable persistence failing even after the
    /// purge-and-retry; the in-memory index is consistent regardless.
    #[tracing::instrument(skip(self, record, options), fields(online = self.is_online()))]
    pub async fn put(&self, record: Record, options: PutOptions) -> Result<Record, StoreError> {
        let start = Instant::now();
        let status = if self.is_online() { "online" } else { "offline" };
        let outcome = self
            .put_impl(record, &options, RemoteWrite::Detached)
            .await?;
        crate::metrics::record_operation("put", status);
        crate::metrics::record_latency("put", start.elapsed());
        if outcome.purged {
            self.sync().await;
        }
        Ok(outcome.record)
    }

    /// Query for records matching `filter`.
    ///
    /// Online, the query runs against the remote service; offline, against
    /// the in-memory index. The two result sets are never merged. A remote
    /// failure flips the store offline and the local results are served.
    #[tracing::instrument(skip(self, filter, options))]
    pub async fn query(&self, filter: &Filter, options: &QueryOptions) -> Vec<Record> {
        if self.is_online() {
            match self.remote.query(filter, options).await {
                Ok(records) => {
                    crate::metrics::record_operation("query", "remote");
                    return records;
                }
                Err(error) => {
                    warn!(%error, "remote query failed, serving local results");
                    self.make_offline();
                }
            }
        }
        crate::metrics::record_operation("query", "local");
        self.index.query(filter, options)
    }

    /// Shared body of `put` and the sync pass's re-put.
    pub(super) async fn put_impl(
        &self,
        mut record: Record,
        options: &PutOptions,
        write: RemoteWrite,
    ) -> Result<PutOutcome, StoreError> {
        let identity = record
            .identity(&self.identity_key)
            .ok_or_else(|| StoreError::MissingIdentity(self.identity_key.clone()))?;

        let mut remote_failed = false;
        if self.is_online() {
            // Optimistic clear: the flags come off before the remote write
            // resolves, so a failure arrives after the record already looks
            // clean.
            record.outdated = false;
            record.modified = false;

            match write {
                RemoteWrite::Detached => {
                    let remote = Arc::clone(&self.remote);
                    let online = Arc::clone(&self.online);
                    let outbound = record.clone();
                    let options = options.clone();
                    tokio::spawn(async move {
                        if let Err(error) = remote.write(&outbound, &options).await {
                            warn!(%error, "background remote write failed");
                            go_offline(&online);
                        }
                    });
                }
                RemoteWrite::Awaited => {
                    if let Err(error) = self.remote.write(&record, options).await {
                        warn!(%error, id = %identity, "remote write failed");
                        self.make_offline();
                        remote_failed = true;
                    }
                }
            }
        } else {
            record.modified = true;
        }

        self.index.upsert(record.clone());
        let purged = self.durable_put(&identity, &record).await?;

        Ok(PutOutcome {
            record,
            purged,
            remote_failed,
        })
    }
}
