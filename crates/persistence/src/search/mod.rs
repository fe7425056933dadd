//! Search vocabulary.
//!
//! The [`IndexRegistry`] maps CQL index names onto catalog columns. Query
//! compilation against a concrete database lives with each backend.

pub mod registry;

pub use registry::{
    AUTHORS_EXPR, DEFAULT_INDEX_NAME, IndexDescriptor, IndexRegistry, Resolution, ScanSource,
    ValueType, registry,
};
