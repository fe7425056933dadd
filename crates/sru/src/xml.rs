//! A small XML element tree and its quick-xml writer.
//!
//! Formatters and response builders assemble [`XmlElement`] trees; text and
//! attribute values are escaped only when the tree is written, so callers
//! always pass raw catalog values.

use std::io::{self, Write};

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

/// A node inside an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

/// An XML element with attributes and ordered children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlNode>,
}

impl XmlElement {
    /// Creates an empty element. `name` may carry a namespace prefix.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Creates an element containing a single text node.
    pub fn text_element(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(name).with_text(text)
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(XmlNode::Text(text.into()));
        self
    }

    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(XmlNode::Element(child));
        self
    }

    /// Appends a child element.
    pub fn push(&mut self, child: XmlElement) {
        self.children.push(XmlNode::Element(child));
    }

    /// Appends `<name>text</name>` unless `text` is missing or blank.
    pub fn push_text<T: AsRef<str>>(&mut self, name: &str, text: Option<T>) {
        if let Some(text) = text.as_ref().map(|t| t.as_ref().trim()).filter(|t| !t.is_empty()) {
            self.push(XmlElement::text_element(name, text));
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the value of an attribute.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Returns the concatenated direct text content.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                XmlNode::Text(text) => Some(text.as_str()),
                XmlNode::Element(_) => None,
            })
            .collect()
    }

    /// Iterates over child elements.
    pub fn children(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(element) => Some(element),
            XmlNode::Text(_) => None,
        })
    }

    /// Returns the first child element named `name`.
    pub fn find(&self, name: &str) -> Option<&XmlElement> {
        self.children().find(|child| child.name == name)
    }

    /// Returns every child element named `name`.
    pub fn find_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children().filter(move |child| child.name == name)
    }

    /// Writes the element and its subtree.
    pub fn write_to<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        if self.children.is_empty() {
            return writer.write_event(Event::Empty(start));
        }

        writer.write_event(Event::Start(start))?;
        for child in &self.children {
            match child {
                XmlNode::Element(element) => element.write_to(writer)?,
                XmlNode::Text(text) => writer.write_event(Event::Text(BytesText::new(text)))?,
            }
        }
        writer.write_event(Event::End(BytesEnd::new(self.name.as_str())))
    }

    /// Serializes the element without an XML declaration.
    pub fn to_xml_string(&self) -> io::Result<String> {
        let mut writer = Writer::new(Vec::new());
        self.write_to(&mut writer)?;
        into_string(writer.into_inner())
    }
}

/// Serializes `root` as a complete UTF-8 document with an XML declaration.
pub fn to_document(root: &XmlElement) -> io::Result<String> {
    let mut writer = Writer::new(Vec::new());
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    root.write_to(&mut writer)?;
    into_string(writer.into_inner())
}

fn into_string(buffer: Vec<u8>) -> io::Result<String> {
    String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escapes_text_and_attributes() {
        let element = XmlElement::new("note")
            .with_attr("kind", "a\"b<c")
            .with_text("Fish & <Chips>");
        let xml = element.to_xml_string().unwrap();
        assert!(xml.starts_with("<note kind=\"a&quot;b&lt;c\">"));
        assert!(xml.contains("Fish &amp; &lt;Chips"));
        assert!(!xml.contains("<Chips"));
    }

    #[test]
    fn test_empty_element_is_self_closing() {
        let xml = XmlElement::new("leader").to_xml_string().unwrap();
        assert_eq!(xml, "<leader/>");
    }

    #[test]
    fn test_push_text_skips_blank() {
        let mut element = XmlElement::new("record");
        element.push_text("title", Some("  Moby Dick "));
        element.push_text("subtitle", Some("   "));
        element.push_text("publisher", None::<&str>);

        assert_eq!(element.children().count(), 1);
        assert_eq!(element.find("title").unwrap().text(), "Moby Dick");
    }

    #[test]
    fn test_document_declaration() {
        let doc = to_document(&XmlElement::text_element("a", "b")).unwrap();
        assert!(doc.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(doc.ends_with("<a>b</a>"));
    }

    #[test]
    fn test_find_all() {
        let element = XmlElement::new("r")
            .with_child(XmlElement::text_element("x", "1"))
            .with_child(XmlElement::text_element("y", "2"))
            .with_child(XmlElement::text_element("x", "3"));
        let values: Vec<String> = element.find_all("x").map(|e| e.text()).collect();
        assert_eq!(values, vec!["1", "3"]);
    }
}
