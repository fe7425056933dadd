//! SRU query parameter extractor.
//!
//! Parameters are kept as raw strings: numeric values are validated by the
//! operations so that a malformed value becomes an SRU diagnostic rather than
//! an HTTP rejection. When a parameter is repeated the first value wins.

use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};

/// The parameters of an SRU request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SruParams {
    pub operation: Option<String>,
    pub version: Option<String>,
    pub query: Option<String>,
    pub start_record: Option<String>,
    pub maximum_records: Option<String>,
    pub record_schema: Option<String>,
    pub record_packing: Option<String>,
    pub sort_keys: Option<String>,
    pub scan_clause: Option<String>,
    pub response_position: Option<String>,
    pub maximum_terms: Option<String>,
}

impl SruParams {
    /// Builds the parameters from decoded key/value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = SruParams::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "operation" => &mut params.operation,
                "version" => &mut params.version,
                "query" => &mut params.query,
                "startRecord" => &mut params.start_record,
                "maximumRecords" => &mut params.maximum_records,
                "recordSchema" => &mut params.record_schema,
                "recordPacking" => &mut params.record_packing,
                "sortKeys" => &mut params.sort_keys,
                "scanClause" => &mut params.scan_clause,
                "responsePosition" => &mut params.response_position,
                "maximumTerms" => &mut params.maximum_terms,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        params
    }

    /// Returns a parameter with surrounding whitespace removed, treating an
    /// empty value as absent.
    pub fn get(value: &Option<String>) -> Option<&str> {
        value.as_deref().map(str::trim).filter(|v| !v.is_empty())
    }
}

impl<S> FromRequestParts<S> for SruParams
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let pairs = match Query::<Vec<(String, String)>>::from_request_parts(parts, state).await {
            Ok(Query(pairs)) => pairs,
            Err(e) => {
                tracing::debug!(error = %e, "Unreadable query string, treating as empty");
                Vec::new()
            }
        };
        Ok(SruParams::from_pairs(pairs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pairs() {
        let params = SruParams::from_pairs([
            ("operation", "searchRetrieve"),
            ("query", "dc.title = moby"),
            ("startRecord", "3"),
            ("x-unknown", "ignored"),
        ]);

        assert_eq!(params.operation.as_deref(), Some("searchRetrieve"));
        assert_eq!(params.query.as_deref(), Some("dc.title = moby"));
        assert_eq!(params.start_record.as_deref(), Some("3"));
        assert!(params.scan_clause.is_none());
    }

    #[test]
    fn test_first_value_wins() {
        let params = SruParams::from_pairs([("version", "1.1"), ("version", "2.0")]);
        assert_eq!(params.version.as_deref(), Some("1.1"));
    }

    #[test]
    fn test_get_treats_blank_as_absent() {
        assert_eq!(SruParams::get(&Some("  ".to_string())), None);
        assert_eq!(SruParams::get(&Some(" mods ".to_string())), Some("mods"));
        assert_eq!(SruParams::get(&None), None);
    }
}
