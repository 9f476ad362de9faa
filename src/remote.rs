//! Remote data-service capability.
//!
//! The engine consumes the remote transport through this trait; HTTP (or
//! whatever carries the requests) stays on the application's side of the
//! boundary. Every operation resolves with success or failure; on failure the
//! engine flips itself offline and serves local data instead, so implementors
//! only need to signal *that* a call failed, not recover from it.

use async_trait::async_trait;
use thiserror::Error;

use crate::query::{Filter, QueryOptions};
use crate::record::Record;
use crate::PutOptions;

/// Failure of a remote operation.
///
/// The engine converts every variant into a mode flip plus a local fallback;
/// none of them reach the caller of `get`, `put`, or `query`.
#[derive(Error, Debug)]
pub enum RemoteError {
    /// The service could not be reached or did not answer.
    #[error("remote service unavailable: {0}")]
    Unavailable(String),
    /// The service answered but rejected the request.
    #[error("remote service rejected request: {0}")]
    Rejected(String),
}

/// Asynchronous request/response capability against the remote data service.
#[async_trait]
pub trait RemoteService: Send + Sync {
    /// Fetch the current server copy of a record.
    async fn fetch(&self, id: &str) -> Result<Record, RemoteError>;

    /// Write a record to the server, resolving to the server's echo of it.
    async fn write(&self, record: &Record, options: &PutOptions) -> Result<Record, RemoteError>;

    /// Run a server-side query.
    async fn query(
        &self,
        filter: &Filter,
        options: &QueryOptions,
    ) -> Result<Vec<Record>, RemoteError>;
}
