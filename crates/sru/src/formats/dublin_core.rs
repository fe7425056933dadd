//! OAI Dublin Core formatter.

use biblio_persistence::types::CatalogRecord;

use super::RecordFormatter;
use crate::xml::XmlElement;

pub const OAI_DC_NAMESPACE: &str = "http://www.openarchives.org/OAI/2.0/oai_dc/";
pub const DC_NAMESPACE: &str = "http://purl.org/dc/elements/1.1/";

/// Formats records as `oai_dc:dc`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DublinCoreFormatter;

impl RecordFormatter for DublinCoreFormatter {
    fn schema_name(&self) -> &'static str {
        "dc"
    }

    fn identifier(&self) -> &'static str {
        "info:srw/schema/1/dc-v1.1"
    }

    fn namespace(&self) -> &'static str {
        OAI_DC_NAMESPACE
    }

    fn title(&self) -> &'static str {
        "Dublin Core"
    }

    fn format(&self, record: &CatalogRecord) -> XmlElement {
        let mut dc = XmlElement::new("oai_dc:dc")
            .with_attr("xmlns:oai_dc", OAI_DC_NAMESPACE)
            .with_attr("xmlns:dc", DC_NAMESPACE);

        let title = match record.subtitle.as_deref().map(str::trim) {
            Some(subtitle) if !subtitle.is_empty() => format!("{}: {}", record.title, subtitle),
            _ => record.title.clone(),
        };
        dc.push_text("dc:title", Some(&title));

        for author in &record.authors {
            dc.push_text("dc:creator", Some(author));
        }
        dc.push_text("dc:publisher", record.publisher.as_deref());
        dc.push_text("dc:date", record.year.map(|y| y.to_string()).as_deref());

        for isbn in [record.isbn13.as_deref(), record.isbn10.as_deref()]
            .into_iter()
            .flatten()
            .filter(|i| !i.trim().is_empty())
        {
            dc.push_text("dc:identifier", Some(&format!("ISBN:{}", isbn)));
        }
        if let Some(ean) = record.ean.as_deref().filter(|e| !e.trim().is_empty()) {
            dc.push_text("dc:identifier", Some(&format!("EAN:{}", ean)));
        }

        dc.push_text("dc:language", record.language.as_deref());
        dc.push_text("dc:description", record.description.as_deref());
        for keyword in record.keyword_list() {
            dc.push_text("dc:subject", Some(keyword));
        }
        if let Some(dewey) = record.dewey_code.as_deref().filter(|d| !d.trim().is_empty()) {
            dc.push_text("dc:coverage", Some(&format!("Dewey:{}", dewey)));
        }

        let mut extent = Vec::new();
        if let Some(pages) = record.pages {
            extent.push(format!("{} pages", pages));
        }
        if let Some(dimensions) = record.dimensions.as_deref().filter(|d| !d.trim().is_empty()) {
            extent.push(dimensions.trim().to_string());
        }
        if !extent.is_empty() {
            dc.push_text("dc:format", Some(&extent.join("; ")));
        }

        dc.push_text("dc:type", Some("Text"));
        dc.push_text("dc:rights", Some(&availability_summary(record)));

        for copy in &record.copies {
            dc.push_text(
                "dc:identifier",
                Some(&format!(
                    "Inventory:{} ({})",
                    copy.inventory_number, copy.status
                )),
            );
        }

        dc
    }
}

fn availability_summary(record: &CatalogRecord) -> String {
    if record.copies.is_empty() {
        return "No copies held".to_string();
    }
    format!(
        "Available: {} of {} copies",
        record.available_copies(),
        record.copies.len()
    )
}
