//! Rate-limit window storage.

use async_trait::async_trait;

use crate::error::StorageResult;
use crate::types::RateLimitWindow;

/// Persistent per-client request counters.
///
/// # Atomicity
///
/// [`record_request`](RateLimitStore::record_request) must count the request
/// in a single atomic step: insert a fresh window, increment a live one, or
/// reset an expired one to one. Implementations must not read the counter and
/// write it back in separate statements, since concurrent requests from the
/// same client would then be able to skip the limit.
#[async_trait]
pub trait RateLimitStore: Send + Sync {
    /// Counts one request from `ip` at unix time `now` and returns the updated
    /// count for the client's window.
    ///
    /// Windows that started `window_secs` or more before `now` are purged
    /// first.
    async fn record_request(&self, ip: &str, now: i64, window_secs: i64) -> StorageResult<u32>;

    /// Returns the stored window for `ip`, if any.
    async fn window(&self, ip: &str) -> StorageResult<Option<RateLimitWindow>>;
}
