//! Error types for the persistence layer.
//!
//! Storage failures are split into search errors, which describe a query the
//! catalog refuses to run, and backend errors, which describe a failure of the
//! database itself. Callers facing clients are expected to surface the former
//! and redact the latter.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

/// The primary error type for all storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Search operation errors
    #[error(transparent)]
    Search(#[from] SearchError),

    /// Backend-specific errors
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl StorageError {
    /// Returns true if the error was caused by the request rather than the backend.
    pub fn is_client_error(&self) -> bool {
        matches!(self, StorageError::Search(_))
    }
}

/// Errors raised while compiling a catalog query.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The index is not part of the registry and strict resolution is enabled.
    #[error("unsupported index: {index}")]
    UnsupportedIndex { index: String },

    /// A sort key could not be interpreted.
    #[error("invalid sort key '{key}': {message}")]
    InvalidSortKey { key: String, message: String },
}

/// Errors from the storage backend itself.
#[derive(Error, Debug)]
pub enum BackendError {
    /// Connection to the backend failed.
    #[error("connection failed to {backend_name}: {message}")]
    ConnectionFailed {
        backend_name: String,
        message: String,
    },

    /// Connection pool exhausted.
    #[error("connection pool exhausted for {backend_name}")]
    PoolExhausted { backend_name: String },

    /// Schema migration error.
    #[error("schema migration failed: {message}")]
    MigrationError { message: String },

    /// Internal backend error.
    #[error("internal error in {backend_name}: {message}")]
    Internal {
        backend_name: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Query execution error.
    #[error("query execution failed: {message}")]
    QueryError { message: String },

    /// Serialization/deserialization error.
    #[error("serialization error: {message}")]
    SerializationError { message: String },
}

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Result type alias for search operations.
pub type SearchResult<T> = Result<T, SearchError>;

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Backend(BackendError::SerializationError {
            message: err.to_string(),
        })
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        StorageError::Backend(BackendError::Internal {
            backend_name: "sqlite".to_string(),
            message: err.to_string(),
            source: Some(Box::new(err)),
        })
    }
}

#[cfg(feature = "sqlite")]
impl From<r2d2::Error> for StorageError {
    fn from(_err: r2d2::Error) -> Self {
        StorageError::Backend(BackendError::PoolExhausted {
            backend_name: "sqlite".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_error_display() {
        let err = StorageError::Search(SearchError::UnsupportedIndex {
            index: "marc.245".to_string(),
        });
        assert_eq!(err.to_string(), "unsupported index: marc.245");
        assert!(err.is_client_error());
    }

    #[test]
    fn test_backend_error_is_not_client_error() {
        let err: StorageError = BackendError::QueryError {
            message: "no such table: books".to_string(),
        }
        .into();
        assert!(!err.is_client_error());
        assert!(err.to_string().contains("no such table"));
    }

    #[test]
    fn test_from_serde_json() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: StorageError = parse_err.into();
        assert!(matches!(
            err,
            StorageError::Backend(BackendError::SerializationError { .. })
        ));
    }

    #[test]
    fn test_sort_key_error_display() {
        let err = SearchError::InvalidSortKey {
            key: "title,sideways".to_string(),
            message: "unknown direction".to_string(),
        };
        assert!(err.to_string().contains("title,sideways"));
    }
}
