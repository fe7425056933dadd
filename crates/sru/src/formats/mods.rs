//! MODS 3.7 formatter.

use biblio_persistence::types::CatalogRecord;

use super::RecordFormatter;
use crate::xml::XmlElement;

pub const MODS_NAMESPACE: &str = "http://www.loc.gov/mods/v3";

/// Formats records as MODS.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModsFormatter;

impl RecordFormatter for ModsFormatter {
    fn schema_name(&self) -> &'static str {
        "mods"
    }

    fn identifier(&self) -> &'static str {
        "info:srw/schema/1/mods-v3.7"
    }

    fn namespace(&self) -> &'static str {
        MODS_NAMESPACE
    }

    fn title(&self) -> &'static str {
        "MODS"
    }

    fn format(&self, record: &CatalogRecord) -> XmlElement {
        let mut mods = XmlElement::new("mods")
            .with_attr("xmlns", MODS_NAMESPACE)
            .with_attr("version", "3.7");

        let mut title_info = XmlElement::new("titleInfo");
        title_info.push_text("title", Some(&record.title));
        title_info.push_text("subTitle", record.subtitle.as_deref());
        mods.push(title_info);

        for author in &record.authors {
            mods.push(
                XmlElement::new("name")
                    .with_attr("type", "personal")
                    .with_child(XmlElement::text_element("namePart", author.as_str()))
                    .with_child(
                        XmlElement::new("role").with_child(
                            XmlElement::text_element("roleTerm", "author")
                                .with_attr("type", "text")
                                .with_attr("authority", "marcrelator"),
                        ),
                    ),
            );
        }

        mods.push(XmlElement::text_element("typeOfResource", "text"));

        let mut origin = XmlElement::new("originInfo");
        origin.push_text("publisher", record.publisher.as_deref());
        if let Some(year) = record.year {
            origin.push(
                XmlElement::text_element("dateIssued", year.to_string())
                    .with_attr("encoding", "w3cdtf"),
            );
        }
        if origin.children().next().is_some() {
            mods.push(origin);
        }

        if let Some(language) = non_blank(record.language.as_deref()) {
            mods.push(
                XmlElement::new("language").with_child(
                    XmlElement::text_element("languageTerm", language)
                        .with_attr("type", "code")
                        .with_attr("authority", "iso639-2b"),
                ),
            );
        }

        let mut physical = XmlElement::new("physicalDescription");
        physical.push_text("extent", record.pages.map(|p| format!("{} pages", p)));
        if let Some(dimensions) = non_blank(record.dimensions.as_deref()) {
            physical.push(
                XmlElement::text_element("note", dimensions).with_attr("type", "dimensions"),
            );
        }
        if physical.children().next().is_some() {
            mods.push(physical);
        }

        mods.push_text("abstract", record.description.as_deref());

        for keyword in record.keyword_list() {
            mods.push(
                XmlElement::new("subject").with_child(XmlElement::text_element("topic", keyword)),
            );
        }

        if let Some(dewey) = non_blank(record.dewey_code.as_deref()) {
            mods.push(
                XmlElement::text_element("classification", dewey).with_attr("authority", "ddc"),
            );
        }

        for isbn in [record.isbn13.as_deref(), record.isbn10.as_deref()]
            .into_iter()
            .filter_map(non_blank)
        {
            mods.push(XmlElement::text_element("identifier", isbn).with_attr("type", "isbn"));
        }
        if let Some(ean) = non_blank(record.ean.as_deref()) {
            mods.push(XmlElement::text_element("identifier", ean).with_attr("type", "ean"));
        }

        if let Some(location) = holdings(record) {
            mods.push(location);
        }

        let mut record_info = XmlElement::new("recordInfo");
        record_info.push(XmlElement::text_element("recordIdentifier", record.id.to_string()));
        if let Some(created) = record.created_at {
            record_info.push(
                XmlElement::text_element(
                    "recordCreationDate",
                    created.format("%Y-%m-%d").to_string(),
                )
                .with_attr("encoding", "iso8601"),
            );
        }
        mods.push(record_info);

        mods
    }
}

/// `location` with the shelf and one `copyInformation` per copy.
fn holdings(record: &CatalogRecord) -> Option<XmlElement> {
    let shelf = record.location();
    if shelf.is_none() && record.copies.is_empty() {
        return None;
    }

    let mut location = XmlElement::new("location");
    location.push_text("shelfLocator", shelf);

    if !record.copies.is_empty() {
        let mut holding = XmlElement::new("holdingSimple");
        for copy in &record.copies {
            let mut info = XmlElement::new("copyInformation");
            info.push_text("itemIdentifier", Some(&copy.inventory_number));
            info.push(
                XmlElement::text_element("note", copy.status.as_str()).with_attr("type", "status"),
            );
            info.push_text("note", copy.notes.as_deref());
            holding.push(info);
        }
        location.push(holding);
    }

    Some(location)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
