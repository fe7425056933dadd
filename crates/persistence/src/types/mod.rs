//! Core types for the persistence layer.
//!
//! - [`CatalogRecord`], [`CopyRecord`] - Bibliographic records and their holdings
//! - [`CatalogQuery`], [`SearchOutcome`] - Search requests and results
//! - [`ScanRequest`], [`ScanTerm`] - Index term browsing
//! - [`RateLimitWindow`] - Per-client request counters
//! - [`AccessLogEntry`], [`AccessLogCompletion`] - Request audit rows
//!
//! # Examples
//!
//! ```
//! use biblio_persistence::types::{CatalogRecord, CopyRecord, CopyStatus};
//!
//! let mut record = CatalogRecord::new("Moby Dick");
//! record.authors.push("Herman Melville".to_string());
//! record.copies.push(CopyRecord::new("INV-0001", CopyStatus::Disponibile));
//! record.copies.push(CopyRecord::new("INV-0002", CopyStatus::Prestato));
//!
//! assert_eq!(record.available_copies(), 1);
//! assert_eq!(record.first_author(), Some("Herman Melville"));
//! ```

mod access_log;
mod rate_limit;
mod record;
mod search;

pub use access_log::{AccessLogCompletion, AccessLogEntry, AccessLogRecord};
pub use rate_limit::RateLimitWindow;
pub use record::{CatalogRecord, CopyRecord, CopyStatus, UnknownCopyStatus, normalize_isbn};
pub use search::{
    CatalogQuery, ScanRequest, ScanTerm, SearchOutcome, SortDirection, SortField, SortKey,
};
