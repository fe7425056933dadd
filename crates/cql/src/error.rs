//! Error types for CQL tokenizing and parsing.

use thiserror::Error;

/// Errors produced while turning query text into an AST.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CqlError {
    /// The query text is malformed or exceeds one of the parser bounds.
    #[error("invalid CQL syntax: {message}")]
    InvalidSyntax {
        /// Human-readable description of the problem.
        message: String,
        /// Character offset where the problem was detected, when known.
        position: Option<usize>,
    },

    /// A relation was expected but something else was found.
    #[error("unsupported relation: {relation}")]
    UnsupportedRelation {
        /// The token found in relation position.
        relation: String,
    },
}

impl CqlError {
    pub(crate) fn syntax(message: impl Into<String>) -> Self {
        CqlError::InvalidSyntax {
            message: message.into(),
            position: None,
        }
    }

    pub(crate) fn syntax_at(message: impl Into<String>, position: usize) -> Self {
        CqlError::InvalidSyntax {
            message: message.into(),
            position: Some(position),
        }
    }

    /// Returns the offending text or message, suitable for a diagnostic `details` field.
    pub fn details(&self) -> &str {
        match self {
            CqlError::InvalidSyntax { message, .. } => message,
            CqlError::UnsupportedRelation { relation } => relation,
        }
    }
}

/// Result alias for parser operations.
pub type CqlResult<T> = Result<T, CqlError>;
