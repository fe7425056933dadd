//! MARC 21 slim (MARCXML) formatter.

use biblio_persistence::types::CatalogRecord;

use super::RecordFormatter;
use crate::xml::XmlElement;

pub const MARC_NAMESPACE: &str = "http://www.loc.gov/MARC21/slim";

/// Leader for a language material monograph with unknown record length.
const LEADER: &str = "00000nam a2200000 a 4500";

/// Formats records as MARCXML.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarcXmlFormatter;

impl RecordFormatter for MarcXmlFormatter {
    fn schema_name(&self) -> &'static str {
        "marcxml"
    }

    fn identifier(&self) -> &'static str {
        "info:srw/schema/1/marcxml-v1.1"
    }

    fn namespace(&self) -> &'static str {
        MARC_NAMESPACE
    }

    fn title(&self) -> &'static str {
        "MARCXML"
    }

    fn format(&self, record: &CatalogRecord) -> XmlElement {
        let mut root = XmlElement::new("record").with_attr("xmlns", MARC_NAMESPACE);

        root.push(XmlElement::text_element("leader", LEADER));
        root.push(control_field("001", record.id.to_string()));
        root.push(control_field("008", fixed_length_data(record)));

        for isbn in [record.isbn13.as_deref(), record.isbn10.as_deref()]
            .into_iter()
            .flatten()
        {
            root.push(data_field("020", ' ', ' ', &[('a', Some(isbn))]));
        }
        if let Some(ean) = non_blank(record.ean.as_deref()) {
            root.push(data_field("024", '3', ' ', &[('a', Some(ean))]));
        }
        if let Some(language) = non_blank(record.language.as_deref()) {
            root.push(data_field("041", ' ', ' ', &[('a', Some(language))]));
        }
        if let Some(dewey) = non_blank(record.dewey_code.as_deref()) {
            root.push(data_field("082", '0', '4', &[('a', Some(dewey))]));
        }

        let mut authors = record.authors.iter();
        if let Some(first) = authors.next() {
            root.push(data_field("100", '1', ' ', &[('a', Some(first.as_str()))]));
        }

        let title_indicator = if record.authors.is_empty() { '0' } else { '1' };
        root.push(data_field(
            "245",
            title_indicator,
            '0',
            &[
                ('a', Some(record.title.as_str())),
                ('b', record.subtitle.as_deref()),
            ],
        ));

        let year = record.year.map(|y| y.to_string());
        if record.publisher.is_some() || year.is_some() {
            root.push(data_field(
                "260",
                ' ',
                ' ',
                &[('b', record.publisher.as_deref()), ('c', year.as_deref())],
            ));
        }

        let pages = record.pages.map(|p| format!("{} p.", p));
        if pages.is_some() || non_blank(record.dimensions.as_deref()).is_some() {
            root.push(data_field(
                "300",
                ' ',
                ' ',
                &[('a', pages.as_deref()), ('c', record.dimensions.as_deref())],
            ));
        }

        if let Some(description) = non_blank(record.description.as_deref()) {
            root.push(data_field("520", ' ', ' ', &[('a', Some(description))]));
        }

        for keyword in record.keyword_list() {
            root.push(data_field("650", ' ', '4', &[('a', Some(keyword))]));
        }

        for author in authors {
            root.push(data_field("700", '1', ' ', &[('a', Some(author.as_str()))]));
        }

        let location = record.location();
        for copy in &record.copies {
            root.push(data_field(
                "852",
                ' ',
                ' ',
                &[
                    ('b', location.as_deref()),
                    ('p', Some(copy.inventory_number.as_str())),
                    ('x', Some(copy.status.as_str())),
                    ('z', copy.notes.as_deref()),
                ],
            ));
        }

        if !record.copies.is_empty() {
            let summary = format!(
                "Total copies: {}, Available: {}",
                record.copies.len(),
                record.available_copies()
            );
            root.push(data_field("866", ' ', ' ', &[('a', Some(summary.as_str()))]));
        }

        root
    }
}

fn control_field(tag: &str, value: impl Into<String>) -> XmlElement {
    XmlElement::text_element("controlfield", value).with_attr("tag", tag)
}

/// Builds a datafield, dropping subfields without a value.
fn data_field(tag: &str, ind1: char, ind2: char, subfields: &[(char, Option<&str>)]) -> XmlElement {
    let mut field = XmlElement::new("datafield")
        .with_attr("tag", tag)
        .with_attr("ind1", ind1.to_string())
        .with_attr("ind2", ind2.to_string());

    for (code, value) in subfields {
        if let Some(value) = non_blank(*value) {
            field.push(
                XmlElement::text_element("subfield", value).with_attr("code", code.to_string()),
            );
        }
    }
    field
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Builds the 40-character 008 field.
///
/// | Positions | Content |
/// |-----------|---------|
/// | 00-05 | Date entered (`yymmdd`) |
/// | 06 | `s` single known date, `n` unknown |
/// | 07-10 | Publication year |
/// | 11-14 | Second date (blank) |
/// | 15-17 | Place of publication (`xx `) |
/// | 18-34 | Material specific (blank) |
/// | 35-37 | Language |
/// | 38-39 | Modified record, cataloging source |
pub(crate) fn fixed_length_data(record: &CatalogRecord) -> String {
    let entered = record
        .created_at
        .map(|t| t.format("%y%m%d").to_string())
        .unwrap_or_else(|| "000000".to_string());

    let (date_type, year) = match record.year {
        Some(year) if (0..=9999).contains(&year) => ('s', format!("{:04}", year)),
        _ => ('n', "uuuu".to_string()),
    };

    let language = language_code(record.language.as_deref());

    let mut field = String::with_capacity(40);
    field.push_str(&entered);
    field.push(date_type);
    field.push_str(&year);
    field.push_str("    ");
    field.push_str("xx ");
    field.push_str(&" ".repeat(17));
    field.push_str(&language);
    field.push(' ');
    field.push('d');
    field
}

/// Three lower-case ASCII letters, `und` when unknown.
fn language_code(language: Option<&str>) -> String {
    let code: String = language
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .take(3)
        .collect::<String>()
        .to_ascii_lowercase();
    if code.len() == 3 { code } else { "und".to_string() }
}
