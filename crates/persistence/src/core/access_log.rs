//! Access log storage.

use async_trait::async_trait;

use crate::error::StorageResult;
use crate::types::{AccessLogCompletion, AccessLogEntry, AccessLogRecord};

/// Append-only audit trail of SRU requests.
///
/// A row is inserted when a request starts and completed exactly once when
/// its response is ready. The row id returned by
/// [`open_entry`](AccessLogStore::open_entry) belongs to the request that
/// created it and is passed back explicitly.
#[async_trait]
pub trait AccessLogStore: Send + Sync {
    /// Inserts an entry and returns its row id.
    async fn open_entry(&self, entry: &AccessLogEntry) -> StorageResult<i64>;

    /// Records the outcome of the request that opened entry `id`.
    async fn complete_entry(&self, id: i64, completion: &AccessLogCompletion)
    -> StorageResult<()>;

    /// Returns the most recent entries, newest first.
    async fn recent_entries(&self, limit: usize) -> StorageResult<Vec<AccessLogRecord>>;
}
