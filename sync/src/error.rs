//! Unified error handling for the sync runner.
//!
//! Every variant carries the table it happened in; a table's failure is
//! isolated by the orchestrator and never crashes the process.

use crate::remote::RemoteError;
use crate::source::SourceError;
use thiserror::Error;

/// A failed table sync.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Remote partial fetch failed; the table is aborted, others continue.
    #[error("table '{table}': remote fetch failed")]
    Fetch {
        table: String,
        #[source]
        source: RemoteError,
    },

    /// Insert or upsert rejected by the remote store. Bulk operations are
    /// atomic-or-nothing at the remote's discretion, so no per-row retries.
    #[error("table '{table}': {operation} submission rejected")]
    Submission {
        table: String,
        operation: &'static str,
        #[source]
        source: RemoteError,
    },

    /// Local snapshot could not be read for this table.
    #[error("table '{table}': local snapshot unavailable")]
    Source {
        table: String,
        #[source]
        source: SourceError,
    },

    /// Engine-level failure, currently only a duplicate identity key.
    #[error(transparent)]
    Engine(#[from] mirror_engine::Error),
}

/// Result type alias for the runner.
pub type Result<T> = std::result::Result<T, SyncError>;
