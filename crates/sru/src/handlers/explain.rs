//! Explain operation.
//!
//! Describes the server without touching the catalog: server and database
//! information, the index vocabulary grouped by context set, the record
//! schemas and the configured limits, as a ZeeRex record.

use biblio_cql::Relation;
use biblio_persistence::search::registry;

use crate::config::{DEFAULT_MAXIMUM_TERMS, MAX_MAXIMUM_TERMS, MAX_START_RECORD, ServerConfig};
use crate::formats::all_formatters;
use crate::responses::Operation;
use crate::xml::XmlElement;

pub const ZEEREX_NAMESPACE: &str = "http://explain.z3950.org/dtd/2.0/";

/// Identifier URI of each context set in the registry.
fn context_set_identifier(set: &str) -> &'static str {
    match set {
        "cql" => "info:srw/cql-context-set/1/cql-v1.2",
        "dc" => "info:srw/cql-context-set/1/dc-v1.1",
        "bath" => "http://zing.z3950.org/cql/bath/2.0/",
        "rec" => "info:srw/cql-context-set/2/rec-1.1",
        _ => "info:srw/cql-context-set/local/library",
    }
}

/// Builds the explain response.
pub fn explain(config: &ServerConfig, version: &str) -> XmlElement {
    let record = XmlElement::new("srw:record")
        .with_child(XmlElement::text_element("srw:recordSchema", ZEEREX_NAMESPACE))
        .with_child(XmlElement::text_element("srw:recordPacking", "xml"))
        .with_child(XmlElement::new("srw:recordData").with_child(zeerex(config, version)));

    Operation::Explain.envelope(version).with_child(record)
}

fn zeerex(config: &ServerConfig, version: &str) -> XmlElement {
    let server_info = XmlElement::new("serverInfo")
        .with_attr("protocol", "SRU")
        .with_attr("version", version)
        .with_child(XmlElement::text_element("host", config.host.as_str()))
        .with_child(XmlElement::text_element("port", config.port.to_string()))
        .with_child(XmlElement::text_element("database", config.database_name.as_str()));

    let mut database_info = XmlElement::new("databaseInfo");
    database_info.push_text("title", Some(&config.database_title));
    database_info.push_text("description", Some(&config.database_description));

    let mut index_info = XmlElement::new("indexInfo");
    let sets = registry().by_set();
    for (set, _) in &sets {
        index_info.push(
            XmlElement::new("set")
                .with_attr("name", *set)
                .with_attr("identifier", context_set_identifier(set)),
        );
    }
    for (_, indexes) in &sets {
        for index in indexes {
            index_info.push(
                XmlElement::new("index")
                    .with_attr("id", index.qualified_name())
                    .with_child(XmlElement::text_element("title", index.title))
                    .with_child(
                        XmlElement::new("map").with_child(
                            XmlElement::text_element("name", index.name)
                                .with_attr("set", index.set),
                        ),
                    ),
            );
        }
    }

    let mut schema_info = XmlElement::new("schemaInfo");
    for formatter in all_formatters() {
        schema_info.push(
            XmlElement::new("schema")
                .with_attr("identifier", formatter.identifier())
                .with_attr("name", formatter.schema_name())
                .with_attr("sort", "true")
                .with_attr("retrieve", "true")
                .with_child(XmlElement::text_element("title", formatter.title())),
        );
    }

    let mut config_info = XmlElement::new("configInfo")
        .with_child(setting("default", "numberOfRecords", config.default_maximum_records))
        .with_child(setting("default", "recordSchema", &config.default_schema))
        .with_child(setting("default", "numberOfTerms", DEFAULT_MAXIMUM_TERMS))
        .with_child(setting("setting", "maximumRecords", config.max_maximum_records))
        .with_child(setting("setting", "maximumStartRecord", MAX_START_RECORD))
        .with_child(setting("setting", "maximumTerms", MAX_MAXIMUM_TERMS))
        .with_child(setting("supports", "sort", "true"))
        .with_child(setting("supports", "recordPacking", "xml string"));
    for relation in Relation::all() {
        config_info.push(setting("supports", "relation", relation.as_str()));
    }

    XmlElement::new("explain")
        .with_attr("xmlns", ZEEREX_NAMESPACE)
        .with_child(server_info)
        .with_child(database_info)
        .with_child(index_info)
        .with_child(schema_info)
        .with_child(config_info)
}

fn setting(element: &str, kind: &str, value: impl ToString) -> XmlElement {
    XmlElement::text_element(element, value.to_string()).with_attr("type", kind)
}
