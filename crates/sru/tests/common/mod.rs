//! Common test utilities for SRU endpoint testing.
//!
//! - [`fixtures`] - Sample catalog
//! - [`harness`] - Test server wired to an in-memory backend

pub mod fixtures;
pub mod harness;

pub use fixtures::*;
pub use harness::*;
