//! SQLite backend implementation.
//!
//! Implements [`CatalogStore`](crate::core::CatalogStore),
//! [`RateLimitStore`](crate::core::RateLimitStore) and
//! [`AccessLogStore`](crate::core::AccessLogStore) over a pooled SQLite
//! database, in memory or on disk.
//!
//! # Example
//!
//! ```no_run
//! use biblio_persistence::backends::sqlite::SqliteBackend;
//! use biblio_persistence::types::CatalogRecord;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = SqliteBackend::in_memory()?;
//! backend.init_schema()?;
//! backend.import_records(&[CatalogRecord::new("Moby Dick")])?;
//! # Ok(())
//! # }
//! ```
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE books (
//!     id INTEGER PRIMARY KEY AUTOINCREMENT,
//!     title TEXT NOT NULL,
//!     subtitle TEXT, publisher TEXT, year INTEGER,
//!     isbn10 TEXT, isbn13 TEXT, ean TEXT, language TEXT,
//!     pages INTEGER, dimensions TEXT, description TEXT, keywords TEXT,
//!     dewey_code TEXT, shelf TEXT, level TEXT,
//!     created_at TEXT NOT NULL
//! );
//! CREATE TABLE authors (id INTEGER PRIMARY KEY, name TEXT NOT NULL UNIQUE);
//! CREATE TABLE book_authors (book_id, author_id, position, PRIMARY KEY (book_id, author_id));
//! CREATE TABLE copies (id, book_id, inventory_number UNIQUE, status, notes);
//! CREATE TABLE sru_rate_limits (ip PRIMARY KEY, request_count, window_start, last_request);
//! CREATE TABLE sru_access_log (id, ip, user_agent, operation, query, format,
//!     response_time_ms, http_status, error_message, created_at);
//! ```

mod access_log;
mod backend;
mod catalog;
mod rate_limit;
mod schema;
pub mod search;

pub use backend::{SqliteBackend, SqliteBackendConfig};
pub use schema::SCHEMA_VERSION;
