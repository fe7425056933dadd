//! Rate-limit window type.

use serde::{Deserialize, Serialize};

/// The request counter for one client address.
///
/// Timestamps are unix seconds. A window is live while
/// `window_start > now - window_secs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitWindow {
    /// Client address the window belongs to.
    pub ip: String,
    /// Requests counted in the current window.
    pub request_count: u32,
    /// Start of the current window.
    pub window_start: i64,
    /// Time of the most recent request.
    pub last_request: i64,
}

impl RateLimitWindow {
    /// Returns true if the window is still in effect at `now`.
    pub fn is_live(&self, now: i64, window_secs: i64) -> bool {
        self.window_start > now - window_secs
    }

    /// Seconds until the window expires, never less than one.
    pub fn retry_after(&self, now: i64, window_secs: i64) -> i64 {
        (self.window_start + window_secs - now).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(start: i64) -> RateLimitWindow {
        RateLimitWindow {
            ip: "10.0.0.1".to_string(),
            request_count: 3,
            window_start: start,
            last_request: start,
        }
    }

    #[test]
    fn test_is_live() {
        let w = window(1_000);
        assert!(w.is_live(1_000, 60));
        assert!(w.is_live(1_059, 60));
        assert!(!w.is_live(1_060, 60));
    }

    #[test]
    fn test_retry_after() {
        let w = window(1_000);
        assert_eq!(w.retry_after(1_010, 60), 50);
        assert_eq!(w.retry_after(2_000, 60), 1);
    }
}
