//! Search, sort and scan request types.

use biblio_cql::{Condition, CqlNode};
use serde::{Deserialize, Serialize};

use crate::error::{SearchError, SearchResult};

use super::CatalogRecord;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortDirection {
    /// Ascending order.
    #[default]
    Ascending,
    /// Descending order.
    Descending,
}

impl SortDirection {
    /// SQL keyword for the direction.
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        }
    }

    fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "" | "asc" | "ascending" | "1" | "true" => Some(SortDirection::Ascending),
            "desc" | "descending" | "0" | "false" => Some(SortDirection::Descending),
            _ => None,
        }
    }
}

/// Fields a result set can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortField {
    Title,
    /// Orders by the concatenated author display string, not by a
    /// per-author key.
    Creator,
    Date,
    Isbn,
}

impl SortField {
    /// Maps a sort path to a field. `dc.` and `bath.` prefixes are accepted.
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.trim().to_ascii_lowercase();
        let bare = path
            .strip_prefix("dc.")
            .or_else(|| path.strip_prefix("bath."))
            .unwrap_or(&path);
        match bare {
            "title" => Some(SortField::Title),
            "creator" | "author" => Some(SortField::Creator),
            "date" | "year" => Some(SortField::Date),
            "isbn" => Some(SortField::Isbn),
            _ => None,
        }
    }
}

/// A single sort directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortKey {
    /// Parses an SRU `sortKeys` value.
    ///
    /// Keys are separated by whitespace. Each key is either `path,direction`
    /// or the SRU 1.1 form `path,schema,ascending[,...]` where `ascending` is
    /// `1`/`true` or `0`/`false`. Keys naming an unknown path are skipped.
    pub fn parse_list(input: &str) -> SearchResult<Vec<SortKey>> {
        let mut keys = Vec::new();

        for raw in input.split_whitespace() {
            let parts: Vec<&str> = raw.split(',').collect();
            let direction_token = match parts.len() {
                1 => "",
                2 => parts[1],
                _ => parts[2],
            };

            let direction =
                SortDirection::parse(direction_token).ok_or_else(|| SearchError::InvalidSortKey {
                    key: raw.to_string(),
                    message: format!("unknown sort direction '{}'", direction_token),
                })?;

            if let Some(field) = SortField::from_path(parts[0]) {
                keys.push(SortKey { field, direction });
            } else {
                tracing::debug!(key = raw, "Ignoring sort key with unknown path");
            }
        }

        Ok(keys)
    }
}

/// A compiled-ready catalog search.
#[derive(Debug, Clone)]
pub struct CatalogQuery {
    /// Parsed CQL query.
    pub ast: CqlNode,
    pub sort: Vec<SortKey>,
    /// Zero-based offset of the first record to return.
    pub offset: usize,
    /// Maximum records to return. Zero only counts.
    pub limit: usize,
    /// Reject explicit unknown indexes instead of searching everywhere.
    pub strict_indexes: bool,
}

impl CatalogQuery {
    /// Creates a query returning the first `limit` matches in default order.
    pub fn new(ast: CqlNode, limit: usize) -> Self {
        Self {
            ast,
            sort: Vec::new(),
            offset: 0,
            limit,
            strict_indexes: false,
        }
    }

    /// Sets the sort keys.
    pub fn with_sort(mut self, sort: Vec<SortKey>) -> Self {
        self.sort = sort;
        self
    }

    /// Sets the zero-based offset.
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Enables or disables strict index resolution.
    pub fn with_strict_indexes(mut self, strict: bool) -> Self {
        self.strict_indexes = strict;
        self
    }
}

/// Result of a catalog search.
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    /// Total number of matching records.
    pub total: usize,
    /// The requested page, with authors and copies loaded.
    pub records: Vec<CatalogRecord>,
}

/// A request to browse the terms of one index.
#[derive(Debug, Clone)]
pub struct ScanRequest {
    /// The single condition of the scan clause.
    pub condition: Condition,
    pub maximum_terms: usize,
    pub strict_indexes: bool,
}

/// A distinct index term and the number of records carrying it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanTerm {
    pub value: String,
    pub frequency: u64,
}
