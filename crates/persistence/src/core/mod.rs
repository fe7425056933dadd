//! Core storage traits.
//!
//! - [`CatalogStore`] - Catalog search, scan and counting
//! - [`RateLimitStore`] - Atomic per-client request windows
//! - [`AccessLogStore`] - Request audit trail
//!
//! [`LibraryStorage`] is implemented for every type providing all three and is
//! what the SRU layer is generic over.
//!
//! ```ignore
//! use biblio_persistence::core::CatalogStore;
//! use biblio_persistence::types::CatalogQuery;
//!
//! async fn titles<S: CatalogStore>(storage: &S, ast: CqlNode) -> StorageResult<Vec<String>> {
//!     let outcome = storage.search(&CatalogQuery::new(ast, 10)).await?;
//!     Ok(outcome.records.into_iter().map(|r| r.title).collect())
//! }
//! ```

pub mod access_log;
pub mod catalog;
pub mod rate_limit;

pub use access_log::AccessLogStore;
pub use catalog::CatalogStore;
pub use rate_limit::RateLimitStore;

/// Everything the SRU service needs from a storage backend.
pub trait LibraryStorage: CatalogStore + RateLimitStore + AccessLogStore {}

impl<T> LibraryStorage for T where T: CatalogStore + RateLimitStore + AccessLogStore {}
