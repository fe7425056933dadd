//! HTTP middleware for the SRU service.
//!
//! - [`rate_limit`] - Per-client sliding window request limit

pub mod rate_limit;

pub use rate_limit::rate_limit_middleware;
