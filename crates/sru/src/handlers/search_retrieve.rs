//! searchRetrieve operation.

use biblio_persistence::core::{CatalogStore, LibraryStorage};
use biblio_persistence::types::{CatalogQuery, CatalogRecord, SortKey};
use tracing::debug;

use super::positive_param;
use crate::config::MAX_START_RECORD;
use crate::error::{SruError, SruResult};
use crate::extractors::SruParams;
use crate::formats::{RecordFormatter, formatter_for};
use crate::responses::Operation;
use crate::state::AppState;
use crate::xml::XmlElement;

/// How records are embedded in `srw:recordData`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordPacking {
    /// The record element is a child of `recordData`.
    Xml,
    /// The serialized record is escaped text inside `recordData`.
    String,
}

impl RecordPacking {
    pub fn parse(value: Option<&str>) -> SruResult<Self> {
        match value {
            None | Some("xml") => Ok(RecordPacking::Xml),
            Some("string") => Ok(RecordPacking::String),
            Some(other) => Err(SruError::UnsupportedPacking {
                packing: other.to_string(),
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordPacking::Xml => "xml",
            RecordPacking::String => "string",
        }
    }
}

/// Validated searchRetrieve parameters.
struct SearchRequest<'a> {
    query: &'a str,
    start_record: u64,
    maximum_records: usize,
    formatter: &'static dyn RecordFormatter,
    packing: RecordPacking,
    sort_keys: Option<&'a str>,
}

impl<'a> SearchRequest<'a> {
    fn from_params<S>(state: &AppState<S>, params: &'a SruParams) -> SruResult<Self>
    where
        S: LibraryStorage,
    {
        let query = SruParams::get(&params.query).ok_or_else(|| SruError::missing("query"))?;

        let start_record =
            positive_param("startRecord", &params.start_record, 1, 1, MAX_START_RECORD)?;

        let maximum_records = positive_param(
            "maximumRecords",
            &params.maximum_records,
            state.default_maximum_records() as u64,
            0,
            u64::MAX,
        )?
        .min(state.max_maximum_records() as u64) as usize;

        let schema = SruParams::get(&params.record_schema)
            .unwrap_or(state.config().default_schema.as_str());
        let formatter = formatter_for(schema)?;

        let packing = RecordPacking::parse(SruParams::get(&params.record_packing))?;

        Ok(Self {
            query,
            start_record,
            maximum_records,
            formatter,
            packing,
            sort_keys: SruParams::get(&params.sort_keys),
        })
    }
}

/// Runs a search and builds the `searchRetrieveResponse`.
pub async fn search_retrieve<S>(
    state: &AppState<S>,
    params: &SruParams,
    version: &str,
) -> SruResult<XmlElement>
where
    S: LibraryStorage + Send + Sync,
{
    let request = SearchRequest::from_params(state, params)?;

    let sort = match request.sort_keys {
        Some(keys) => SortKey::parse_list(keys)?,
        None => Vec::new(),
    };
    let ast = biblio_cql::parse(request.query)?;

    let query = CatalogQuery::new(ast, request.maximum_records)
        .with_offset((request.start_record - 1) as usize)
        .with_sort(sort)
        .with_strict_indexes(state.config().strict_indexes);

    let outcome = state.storage().search(&query).await?;
    debug!(
        query = request.query,
        total = outcome.total,
        returned = outcome.records.len(),
        "Search executed"
    );

    let mut root = Operation::SearchRetrieve.envelope(version);
    root.push(XmlElement::text_element(
        "srw:numberOfRecords",
        outcome.total.to_string(),
    ));

    if !outcome.records.is_empty() {
        let mut records = XmlElement::new("srw:records");
        for (offset, record) in outcome.records.iter().enumerate() {
            let position = request.start_record + offset as u64;
            records.push(record_element(
                request.formatter,
                request.packing,
                record,
                position,
            )?);
        }
        root.push(records);
    }

    let last_position = request.start_record - 1 + outcome.records.len() as u64;
    if !outcome.records.is_empty() && last_position < outcome.total as u64 {
        root.push(XmlElement::text_element(
            "srw:nextRecordPosition",
            (last_position + 1).to_string(),
        ));
    }

    root.push(echoed_request(&request, version));
    Ok(root)
}

fn record_element(
    formatter: &dyn RecordFormatter,
    packing: RecordPacking,
    record: &CatalogRecord,
    position: u64,
) -> SruResult<XmlElement> {
    let formatted = formatter.format(record);
    let data = match packing {
        RecordPacking::Xml => XmlElement::new("srw:recordData").with_child(formatted),
        RecordPacking::String => {
            let text = formatted
                .to_xml_string()
                .map_err(|e| SruError::Internal(e.to_string()))?;
            XmlElement::new("srw:recordData").with_text(text)
        }
    };

    Ok(XmlElement::new("srw:record")
        .with_child(XmlElement::text_element("srw:recordSchema", formatter.identifier()))
        .with_child(XmlElement::text_element("srw:recordPacking", packing.as_str()))
        .with_child(data)
        .with_child(XmlElement::text_element("srw:recordPosition", position.to_string())))
}

fn echoed_request(request: &SearchRequest<'_>, version: &str) -> XmlElement {
    let mut echoed = XmlElement::new("srw:echoedSearchRetrieveRequest")
        .with_child(XmlElement::text_element("srw:version", version))
        .with_child(XmlElement::text_element("srw:query", request.query))
        .with_child(XmlElement::text_element(
            "srw:startRecord",
            request.start_record.to_string(),
        ))
        .with_child(XmlElement::text_element(
            "srw:maximumRecords",
            request.maximum_records.to_string(),
        ))
        .with_child(XmlElement::text_element(
            "srw:recordPacking",
            request.packing.as_str(),
        ))
        .with_child(XmlElement::text_element(
            "srw:recordSchema",
            request.formatter.schema_name(),
        ));
    echoed.push_text("srw:sortKeys", request.sort_keys);
    echoed
}
