//! Biblio SRU persistence layer.
//!
//! This crate stores the bibliographic catalog and the state the SRU service
//! keeps about its clients, and turns parsed CQL queries into bounded,
//! parameterized SQL.
//!
//! # Architecture
//!
//! - [`types`] - Catalog records, search requests, rate-limit and access-log rows
//! - [`error`] - Error types for all operations
//! - [`search`] - The static index registry
//! - [`core`] - Storage traits
//! - [`backends`] - Backend implementations (SQLite)
//!
//! # Backend Features
//!
//! - `sqlite` (default) - SQLite with in-memory and file modes
//!
//! # Quick Start
//!
//! ```no_run
//! use biblio_persistence::backends::sqlite::SqliteBackend;
//! use biblio_persistence::core::CatalogStore;
//! use biblio_persistence::types::{CatalogQuery, CatalogRecord};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = SqliteBackend::in_memory()?;
//! backend.init_schema()?;
//!
//! let mut record = CatalogRecord::new("Moby Dick");
//! record.authors.push("Herman Melville".to_string());
//! backend.import_records(&[record])?;
//!
//! let ast = biblio_cql::parse("dc.creator = melville")?;
//! let outcome = backend.search(&CatalogQuery::new(ast, 10)).await?;
//! assert_eq!(outcome.total, 1);
//! # Ok(())
//! # }
//! ```
//!
//! # Unknown indexes
//!
//! A query naming an index the registry does not know searches `cql.anywhere`
//! instead of failing. Set [`CatalogQuery::strict_indexes`](types::CatalogQuery)
//! to reject such queries with [`SearchError::UnsupportedIndex`](error::SearchError).

#![warn(rustdoc::missing_crate_level_docs)]

pub mod backends;
pub mod core;
pub mod error;
pub mod search;
pub mod types;

pub use error::{StorageError, StorageResult};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
