//! SQL fragments with bound parameters.

use rusqlite::ToSql;
use rusqlite::types::ToSqlOutput;

use crate::search::AUTHORS_EXPR;
use crate::types::{SortField, SortKey};

/// A fragment of SQL with bound parameters.
///
/// Placeholders are numbered (`?1`, `?2`, ...) in the order of `params`, so a
/// placeholder may be referenced more than once in `sql`.
#[derive(Debug, Clone, Default)]
pub struct SqlFragment {
    /// The SQL clause.
    pub sql: String,
    /// Bound parameter values.
    pub params: Vec<SqlParam>,
}

/// A bound SQL parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    /// String parameter.
    String(String),
    /// Integer parameter.
    Integer(i64),
    /// Float parameter.
    Float(f64),
}

impl SqlParam {
    /// Creates a string parameter.
    pub fn string(s: impl Into<String>) -> Self {
        SqlParam::String(s.into())
    }

    /// Creates an integer parameter.
    pub fn integer(i: i64) -> Self {
        SqlParam::Integer(i)
    }

    /// Creates a float parameter.
    pub fn float(f: f64) -> Self {
        SqlParam::Float(f)
    }

    /// Returns the string value, if this is a string parameter.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SqlParam::String(s) => Some(s),
            _ => None,
        }
    }
}

impl ToSql for SqlParam {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            SqlParam::String(s) => ToSqlOutput::from(s.as_str()),
            SqlParam::Integer(i) => ToSqlOutput::from(*i),
            SqlParam::Float(f) => ToSqlOutput::from(*f),
        })
    }
}

impl SqlFragment {
    /// Creates a new SQL fragment.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Creates a fragment with parameters.
    pub fn with_params(sql: impl Into<String>, params: Vec<SqlParam>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    /// Adds a parameter placeholder and returns the placeholder string.
    pub fn add_param(&mut self, param: SqlParam) -> String {
        self.params.push(param);
        format!("?{}", self.params.len())
    }

    /// Returns true if this fragment is empty.
    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }
}

/// Escapes `%`, `_` and `\` for a `LIKE ... ESCAPE '\'` pattern.
pub fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Builds the ORDER BY clause for a result page.
///
/// The record id is always the final key so pages are stable.
pub fn build_order_by(sort: &[SortKey]) -> String {
    let mut clauses: Vec<String> = sort
        .iter()
        .map(|key| format!("{} {}", sort_column(key.field), key.direction.as_sql()))
        .collect();

    clauses.push("b.id ASC".to_string());

    format!("ORDER BY {}", clauses.join(", "))
}

/// Maps a sort field to the corresponding SQL expression.
fn sort_column(field: SortField) -> &'static str {
    match field {
        SortField::Title => "b.title COLLATE NOCASE",
        // Display string of all authors, so co-authored records sort by
        // their first author followed by the rest.
        SortField::Creator => AUTHORS_EXPR,
        SortField::Date => "b.year",
        SortField::Isbn => "COALESCE(b.isbn13, b.isbn10)",
    }
}
