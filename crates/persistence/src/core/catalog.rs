//! Catalog read trait.

use async_trait::async_trait;

use crate::error::StorageResult;
use crate::types::{CatalogQuery, ScanRequest, ScanTerm, SearchOutcome};

/// Read access to the bibliographic catalog.
///
/// The catalog is never mutated through this trait.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Returns a human-readable name for this storage backend.
    fn backend_name(&self) -> &'static str;

    /// Runs a search, returning the total match count and the requested page.
    ///
    /// Records in the page carry their authors and copies, loaded with one
    /// batched query each regardless of page size.
    async fn search(&self, query: &CatalogQuery) -> StorageResult<SearchOutcome>;

    /// Browses distinct terms of one index starting with the condition value,
    /// in ascending order.
    async fn scan(&self, request: &ScanRequest) -> StorageResult<Vec<ScanTerm>>;

    /// Number of records in the catalog.
    async fn count_records(&self) -> StorageResult<u64>;
}
