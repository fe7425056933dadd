//! Record formatters.
//!
//! A [`RecordFormatter`] projects a [`CatalogRecord`] and its copies into one
//! bibliographic XML schema. Formatters are pure: they never touch storage and
//! leave escaping to the XML writer.
//!
//! | Name | Schema |
//! |------|--------|
//! | `marcxml` | MARC 21 slim |
//! | `dc`, `oai_dc` | OAI Dublin Core |
//! | `mods` | MODS 3.7 |

mod dublin_core;
mod marcxml;
mod mods;

pub use dublin_core::DublinCoreFormatter;
pub use marcxml::MarcXmlFormatter;
pub use mods::ModsFormatter;

use biblio_persistence::types::CatalogRecord;

use crate::error::{SruError, SruResult};
use crate::xml::XmlElement;

/// Projects catalog records into one XML schema.
pub trait RecordFormatter: Send + Sync {
    /// Short name used in `recordSchema`.
    fn schema_name(&self) -> &'static str;

    /// Schema identifier URI reported in responses.
    fn identifier(&self) -> &'static str;

    /// Namespace of the record root element.
    fn namespace(&self) -> &'static str;

    /// Human-readable schema title for explain.
    fn title(&self) -> &'static str;

    /// Formats one record.
    fn format(&self, record: &CatalogRecord) -> XmlElement;
}

static MARCXML: MarcXmlFormatter = MarcXmlFormatter;
static DUBLIN_CORE: DublinCoreFormatter = DublinCoreFormatter;
static MODS: ModsFormatter = ModsFormatter;

/// Every formatter, in the order explain lists them.
pub fn all_formatters() -> [&'static dyn RecordFormatter; 3] {
    [&MARCXML, &DUBLIN_CORE, &MODS]
}

/// Selects a formatter by short name or schema identifier (case-insensitive).
pub fn formatter_for(name: &str) -> SruResult<&'static dyn RecordFormatter> {
    let name = name.trim();
    let lowered = name.to_ascii_lowercase();
    let wanted = match lowered.as_str() {
        "marc21" => "marcxml",
        "oai_dc" => "dc",
        other => other,
    };

    all_formatters()
        .into_iter()
        .find(|f| f.schema_name() == wanted || f.identifier().eq_ignore_ascii_case(name))
        .ok_or_else(|| SruError::UnknownSchema {
            schema: name.to_string(),
        })
}
