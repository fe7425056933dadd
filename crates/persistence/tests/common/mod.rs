//! Test infrastructure for the persistence layer.

pub mod fixtures;

pub use fixtures::*;
