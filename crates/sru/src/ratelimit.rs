//! Per-client request rate limiting.
//!
//! Each request increments the client's counter in the rate-limit store with
//! a single atomic upsert, so concurrent requests from one address can never
//! both observe the same count. A request is refused once the count for a
//! live window exceeds the configured maximum.
//!
//! Storage failures never block clients: the limiter logs the error and lets
//! the request through.

use std::sync::Arc;

use biblio_persistence::core::RateLimitStore;
use tracing::{error, warn};

/// Outcome of a rate-limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    /// The request may proceed; `count` is the requests seen in this window.
    Allowed { count: u32 },
    /// The request must be refused for `retry_after` seconds.
    Limited { retry_after: i64 },
}

impl RateLimitDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitDecision::Allowed { .. })
    }
}

/// Sliding-window request limiter backed by a [`RateLimitStore`].
#[derive(Debug)]
pub struct RateLimiter<S> {
    storage: Arc<S>,
    max_requests: u32,
    window_secs: i64,
}

impl<S: RateLimitStore> RateLimiter<S> {
    pub fn new(storage: Arc<S>, max_requests: u32, window_secs: i64) -> Self {
        Self {
            storage,
            max_requests,
            window_secs,
        }
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    pub fn window_secs(&self) -> i64 {
        self.window_secs
    }

    /// Records a request from `ip` and returns whether it may proceed.
    pub async fn check_limit(&self, ip: &str) -> bool {
        self.check(ip).await.is_allowed()
    }

    /// Records a request from `ip` at the current time.
    pub async fn check(&self, ip: &str) -> RateLimitDecision {
        self.check_at(ip, chrono::Utc::now().timestamp()).await
    }

    /// Records a request from `ip` at `now` (unix seconds).
    pub async fn check_at(&self, ip: &str, now: i64) -> RateLimitDecision {
        let count = match self.storage.record_request(ip, now, self.window_secs).await {
            Ok(count) => count,
            Err(e) => {
                error!(ip = %ip, error = %e, "Rate limit check failed, allowing request");
                return RateLimitDecision::Allowed { count: 0 };
            }
        };

        if count <= self.max_requests {
            return RateLimitDecision::Allowed { count };
        }

        let retry_after = match self.storage.window(ip).await {
            Ok(Some(window)) => window.retry_after(now, self.window_secs),
            Ok(None) => self.window_secs,
            Err(e) => {
                error!(ip = %ip, error = %e, "Failed to read rate limit window");
                self.window_secs
            }
        };

        warn!(
            ip = %ip,
            count,
            max_requests = self.max_requests,
            retry_after,
            "Rate limit exceeded"
        );

        RateLimitDecision::Limited { retry_after }
    }
}
