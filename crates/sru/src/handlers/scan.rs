//! Scan operation.
//!
//! Browses the distinct terms of one index in ascending order, starting at the
//! value given in the scan clause. Positions are numbered from
//! `responsePosition`.

use biblio_persistence::core::{CatalogStore, LibraryStorage};
use biblio_persistence::types::ScanRequest;
use tracing::debug;

use super::positive_param;
use crate::config::{DEFAULT_MAXIMUM_TERMS, MAX_MAXIMUM_TERMS};
use crate::error::{SruError, SruResult};
use crate::extractors::SruParams;
use crate::responses::Operation;
use crate::state::AppState;
use crate::xml::XmlElement;

/// Runs a scan and builds the `scanResponse`.
pub async fn scan<S>(
    state: &AppState<S>,
    params: &SruParams,
    version: &str,
) -> SruResult<XmlElement>
where
    S: LibraryStorage + Send + Sync,
{
    let clause =
        SruParams::get(&params.scan_clause).ok_or_else(|| SruError::missing("scanClause"))?;
    let response_position =
        positive_param("responsePosition", &params.response_position, 1, 1, u64::MAX)?;
    let maximum_terms = positive_param(
        "maximumTerms",
        &params.maximum_terms,
        DEFAULT_MAXIMUM_TERMS as u64,
        1,
        u64::MAX,
    )?
    .min(MAX_MAXIMUM_TERMS as u64) as usize;

    let ast = biblio_cql::parse(clause)?;
    let condition = ast.as_condition().cloned().ok_or_else(|| SruError::QuerySyntax {
        details: "scan clause must be a single index term".to_string(),
    })?;

    let request = ScanRequest {
        condition,
        maximum_terms,
        strict_indexes: state.config().strict_indexes,
    };
    let terms = state.storage().scan(&request).await?;
    debug!(clause, terms = terms.len(), "Scan executed");

    let mut root = Operation::Scan.envelope(version);
    if !terms.is_empty() {
        let mut list = XmlElement::new("srw:terms");
        for (offset, term) in terms.iter().enumerate() {
            let position = response_position.saturating_add(offset as u64);
            list.push(
                XmlElement::new("srw:term")
                    .with_child(XmlElement::text_element("srw:value", term.value.as_str()))
                    .with_child(XmlElement::text_element(
                        "srw:numberOfRecords",
                        term.frequency.to_string(),
                    ))
                    .with_child(XmlElement::new("srw:extraTermData").with_child(
                        XmlElement::text_element("position", position.to_string()),
                    )),
            );
        }
        root.push(list);
    }

    root.push(
        XmlElement::new("srw:echoedScanRequest")
            .with_child(XmlElement::text_element("srw:version", version))
            .with_child(XmlElement::text_element("srw:scanClause", clause))
            .with_child(XmlElement::text_element(
                "srw:responsePosition",
                response_position.to_string(),
            ))
            .with_child(XmlElement::text_element(
                "srw:maximumTerms",
                maximum_terms.to_string(),
            )),
    );
    Ok(root)
}
