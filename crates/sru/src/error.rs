//! Error types for the SRU service.
//!
//! Every failure of an SRU operation is reported to the client as an SRU
//! diagnostic inside a well-formed XML response. [`SruError`] names the
//! failure; [`Diagnostic`] is what reaches the wire.
//!
//! # Diagnostic Mapping
//!
//! | Error | Code | HTTP Status |
//! |-------|------|-------------|
//! | Internal | 1 | 500 |
//! | UnsupportedOperation | 4 | 200 |
//! | UnsupportedVersion | 5 | 200 |
//! | UnsupportedParameterValue | 6 | 200 |
//! | MissingParameter | 7 | 200 |
//! | QuerySyntax | 10 | 200 |
//! | UnsupportedIndex | 16 | 200 |
//! | UnknownSchema | 66 | 200 |
//! | UnsupportedPacking | 71 | 200 |
//!
//! Storage backend failures are logged in full and reported as diagnostic 1
//! with a generic message.

use axum::http::StatusCode;
use biblio_cql::CqlError;
use biblio_persistence::error::{SearchError, StorageError};
use thiserror::Error;

use crate::xml::XmlElement;

/// Prefix of every diagnostic URI.
pub const DIAGNOSTIC_URI_PREFIX: &str = "info:srw/diagnostic/1/";

/// Namespace of the diagnostic elements.
pub const DIAGNOSTIC_NAMESPACE: &str = "http://www.loc.gov/zing/srw/diagnostic/";

/// The primary error type for SRU operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SruError {
    /// Any failure the client must not see the details of.
    #[error("internal error: {0}")]
    Internal(String),

    #[error("unsupported operation: {operation}")]
    UnsupportedOperation { operation: String },

    #[error("unsupported version: {version}")]
    UnsupportedVersion { version: String },

    #[error("unsupported value for {parameter}: {value}")]
    UnsupportedParameterValue { parameter: String, value: String },

    #[error("missing mandatory parameter: {parameter}")]
    MissingParameter { parameter: String },

    #[error("query syntax error: {details}")]
    QuerySyntax { details: String },

    #[error("unsupported index: {index}")]
    UnsupportedIndex { index: String },

    #[error("unknown record schema: {schema}")]
    UnknownSchema { schema: String },

    #[error("unsupported record packing: {packing}")]
    UnsupportedPacking { packing: String },
}

impl SruError {
    /// Creates a missing-parameter error.
    pub fn missing(parameter: &str) -> Self {
        SruError::MissingParameter {
            parameter: parameter.to_string(),
        }
    }

    /// Creates an unsupported-value error.
    pub fn bad_value(parameter: &str, value: impl Into<String>) -> Self {
        SruError::UnsupportedParameterValue {
            parameter: parameter.to_string(),
            value: value.into(),
        }
    }

    /// Returns the SRU diagnostic code.
    pub fn code(&self) -> u32 {
        match self {
            SruError::Internal(_) => 1,
            SruError::UnsupportedOperation { .. } => 4,
            SruError::UnsupportedVersion { .. } => 5,
            SruError::UnsupportedParameterValue { .. } => 6,
            SruError::MissingParameter { .. } => 7,
            SruError::QuerySyntax { .. } => 10,
            SruError::UnsupportedIndex { .. } => 16,
            SruError::UnknownSchema { .. } => 66,
            SruError::UnsupportedPacking { .. } => 71,
        }
    }

    /// Converts the error into the diagnostic sent to the client.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let details = match self {
            SruError::Internal(_) => None,
            SruError::UnsupportedOperation { operation } => Some(operation.clone()),
            SruError::UnsupportedVersion { version } => Some(version.clone()),
            SruError::UnsupportedParameterValue { parameter, .. } => Some(parameter.clone()),
            SruError::MissingParameter { parameter } => Some(parameter.clone()),
            SruError::QuerySyntax { details } => Some(details.clone()),
            SruError::UnsupportedIndex { index } => Some(index.clone()),
            SruError::UnknownSchema { schema } => Some(schema.clone()),
            SruError::UnsupportedPacking { packing } => Some(packing.clone()),
        };
        Diagnostic::new(self.code(), details)
    }
}

impl From<CqlError> for SruError {
    fn from(err: CqlError) -> Self {
        SruError::QuerySyntax {
            details: err.details().to_string(),
        }
    }
}

impl From<StorageError> for SruError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Search(SearchError::UnsupportedIndex { index }) => {
                SruError::UnsupportedIndex { index }
            }
            StorageError::Search(SearchError::InvalidSortKey { key, .. }) => {
                SruError::bad_value("sortKeys", key)
            }
            StorageError::Backend(e) => {
                tracing::error!(error = %e, "Storage backend failure");
                SruError::Internal(e.to_string())
            }
        }
    }
}

impl From<SearchError> for SruError {
    fn from(err: SearchError) -> Self {
        StorageError::Search(err).into()
    }
}

/// Result type alias for SRU operations.
pub type SruResult<T> = Result<T, SruError>;

/// An SRU diagnostic as written into a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub code: u32,
    pub message: &'static str,
    pub details: Option<String>,
}

impl Diagnostic {
    /// Creates a diagnostic with the standard message for `code`.
    pub fn new(code: u32, details: Option<String>) -> Self {
        Self {
            code,
            message: message_for(code),
            details,
        }
    }

    /// Returns `info:srw/diagnostic/1/{code}`.
    pub fn uri(&self) -> String {
        format!("{}{}", DIAGNOSTIC_URI_PREFIX, self.code)
    }

    /// HTTP status a response carrying this diagnostic is sent with.
    pub fn status(&self) -> StatusCode {
        if self.code == 1 {
            StatusCode::INTERNAL_SERVER_ERROR
        } else {
            StatusCode::OK
        }
    }

    /// Renders the `diag:diagnostic` element.
    pub fn to_xml(&self) -> XmlElement {
        let mut element = XmlElement::new("diag:diagnostic")
            .with_attr("xmlns:diag", DIAGNOSTIC_NAMESPACE)
            .with_child(XmlElement::new("diag:uri").with_text(self.uri()));
        if let Some(details) = &self.details {
            element.push(XmlElement::new("diag:details").with_text(details.as_str()));
        }
        element.with_child(XmlElement::new("diag:message").with_text(self.message))
    }
}

/// Standard message for a diagnostic code.
fn message_for(code: u32) -> &'static str {
    match code {
        1 => "General system error",
        4 => "Unsupported operation",
        5 => "Unsupported version",
        6 => "Unsupported parameter value",
        7 => "Mandatory parameter not supplied",
        10 => "Query syntax error",
        16 => "Unsupported index",
        66 => "Unknown schema for retrieval",
        71 => "Unsupported record packing",
        _ => "Unknown error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use biblio_persistence::error::BackendError;

    #[test]
    fn test_codes() {
        assert_eq!(SruError::missing("query").code(), 7);
        assert_eq!(SruError::bad_value("startRecord", "10001").code(), 6);
        assert_eq!(
            SruError::UnknownSchema {
                schema: "bibtex".into()
            }
            .code(),
            66
        );
    }

    #[test]
    fn test_cql_errors_map_to_syntax() {
        let err: SruError = biblio_cql::parse("title within x").unwrap_err().into();
        assert_eq!(err.code(), 10);
        assert_eq!(err.to_diagnostic().details.as_deref(), Some("within"));
    }

    #[test]
    fn test_unsupported_index_maps_to_16() {
        let err: SruError = StorageError::Search(SearchError::UnsupportedIndex {
            index: "marc.245".into(),
        })
        .into();
        assert_eq!(err.code(), 16);
        assert_eq!(err.to_diagnostic().details.as_deref(), Some("marc.245"));
    }

    #[test]
    fn test_backend_errors_are_redacted() {
        let err: SruError = StorageError::Backend(BackendError::QueryError {
            message: "no such table: books".into(),
        })
        .into();
        let diagnostic = err.to_diagnostic();

        assert_eq!(diagnostic.code, 1);
        assert_eq!(diagnostic.message, "General system error");
        assert!(diagnostic.details.is_none());
        assert_eq!(diagnostic.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_diagnostic_xml() {
        let xml = Diagnostic::new(7, Some("query".into()))
            .to_xml()
            .to_xml_string()
            .unwrap();
        assert!(xml.contains("<diag:uri>info:srw/diagnostic/1/7</diag:uri>"));
        assert!(xml.contains("<diag:details>query</diag:details>"));
        assert!(xml.contains("<diag:message>Mandatory parameter not supplied</diag:message>"));
    }
}
