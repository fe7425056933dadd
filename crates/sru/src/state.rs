//! Application state for the SRU service.
//!
//! This module defines the shared application state that is available to all
//! request handlers and middleware: the storage backend, the configuration
//! and the rate limiter built from it.

use std::sync::Arc;

use biblio_persistence::core::LibraryStorage;

use crate::config::ServerConfig;
use crate::ratelimit::RateLimiter;

/// Shared application state.
///
/// # Type Parameters
///
/// * `S` - The storage backend type (must implement [`LibraryStorage`])
///
/// # Example
///
/// ```rust,ignore
/// use biblio_sru::{AppState, ServerConfig};
/// use biblio_persistence::backends::sqlite::SqliteBackend;
/// use std::sync::Arc;
///
/// let backend = SqliteBackend::in_memory()?;
/// let state = AppState::new(Arc::new(backend), ServerConfig::default());
/// ```
pub struct AppState<S> {
    storage: Arc<S>,
    config: Arc<ServerConfig>,
    rate_limiter: Arc<RateLimiter<S>>,
}

// S sits behind an Arc and need not be Clone.
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            config: Arc::clone(&self.config),
            rate_limiter: Arc::clone(&self.rate_limiter),
        }
    }
}

impl<S: LibraryStorage> AppState<S> {
    /// Creates the state, building the rate limiter from `config`.
    pub fn new(storage: Arc<S>, config: ServerConfig) -> Self {
        let rate_limiter = RateLimiter::new(
            Arc::clone(&storage),
            config.rate_limit_max_requests,
            config.rate_limit_window_secs,
        );
        Self {
            storage,
            config: Arc::new(config),
            rate_limiter: Arc::new(rate_limiter),
        }
    }

    /// Returns a reference to the storage backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Returns a reference to the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn rate_limiter(&self) -> &RateLimiter<S> {
        &self.rate_limiter
    }

    /// Returns the page size for a request that names none.
    pub fn default_maximum_records(&self) -> usize {
        self.config.default_maximum_records
    }

    /// Returns the upper bound for `maximumRecords`.
    pub fn max_maximum_records(&self) -> usize {
        self.config.max_maximum_records
    }
}
