//! Minimal element tree built from `quick-xml` events

use crate::{Error, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// An XML element with its attributes, child elements and text content.
///
/// Text is kept exactly as written. Whitespace-only text of an element with
/// child elements is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Element>,
    /// Concatenated text and CDATA content
    pub text: String,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// First child element with the given name
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |c| c.name == name)
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Parse a document into its root element.
///
/// # Errors
///
/// Returns [`Error::Parse`] for malformed XML and [`Error::Document`] when the
/// document has no root, more than one root, or unclosed elements.
pub fn parse(input: &[u8]) -> Result<Element> {
    let mut reader = Reader::from_reader(input);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => stack.push(element_from(e, &reader)?),
            Ok(Event::Empty(ref e)) => {
                let element = element_from(e, &reader)?;
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::End(_)) => {
                if let Some(mut element) = stack.pop() {
                    if element.has_children() && element.text.trim().is_empty() {
                        element.text.clear();
                    }
                    attach(&mut stack, &mut root, element)?;
                }
            }
            Ok(Event::Text(ref t)) => {
                if let Some(top) = stack.last_mut() {
                    let text = t
                        .unescape()
                        .map_err(|e| Error::parse(reader.buffer_position(), e.to_string()))?;
                    top.text.push_str(&text);
                }
            }
            Ok(Event::CData(t)) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&String::from_utf8_lossy(&t.into_inner()));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::parse(reader.error_position(), e.to_string())),
            Ok(_) => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(Error::document(format!("element '{}' is not closed", open.name)));
    }
    root.ok_or_else(|| Error::document("document has no root element"))
}

fn element_from(start: &BytesStart<'_>, reader: &Reader<&[u8]>) -> Result<Element> {
    let mut element = Element::new(String::from_utf8_lossy(start.name().as_ref()));
    for attribute in start.attributes() {
        let attribute =
            attribute.map_err(|e| Error::parse(reader.buffer_position(), e.to_string()))?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute
            .unescape_value()
            .map_err(|e| Error::parse(reader.buffer_position(), e.to_string()))?
            .into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
        return Ok(());
    }
    if root.is_some() {
        return Err(Error::document(format!(
            "unexpected second root element '{}'",
            element.name
        )));
    }
    *root = Some(element);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tree() {
        let root = parse(
            br#"<?xml version="1.0" encoding="UTF-8"?>
            <model version="1.4">
              <components>
                <component id="1" type="gear_unit">
                  <attribute id="description" unit="none">A &amp; B</attribute>
                  <attribute id="empty" unit="none"/>
                </component>
              </components>
            </model>"#,
        )
        .unwrap();

        assert_eq!(root.name, "model");
        assert_eq!(root.attribute("version"), Some("1.4"));
        let component = root.child("components").unwrap().child("component").unwrap();
        assert_eq!(component.attribute("type"), Some("gear_unit"));
        let attributes: Vec<_> = component.children_named("attribute").collect();
        assert_eq!(attributes.len(), 2);
        assert_eq!(attributes[0].text(), "A & B");
        assert_eq!(attributes[1].text(), "");
    }

    #[test]
    fn test_text_keeps_whitespace() {
        let root = parse(
            b"<attribute id=\"description\"> padded </attribute>",
        )
        .unwrap();
        assert_eq!(root.text(), " padded ");

        let root = parse(b"<array>\n  <c> a</c>\n  <c>b </c>\n</array>").unwrap();
        assert_eq!(root.text(), "");
        let cells: Vec<_> = root.children_named("c").map(Element::text).collect();
        assert_eq!(cells, vec![" a", "b "]);

        let root = parse(b"<attribute>   </attribute>").unwrap();
        assert_eq!(root.text(), "   ");
    }

    #[test]
    fn test_cdata_is_text() {
        let root = parse(b"<a><![CDATA[1 < 2]]></a>").unwrap();
        assert_eq!(root.text(), "1 < 2");
    }

    #[test]
    fn test_malformed_document() {
        assert!(matches!(parse(b"<a><b></a>"), Err(Error::Parse { .. })));
        assert!(parse(b"<a><b>").is_err());
        assert!(matches!(parse(b""), Err(Error::Document(_))));
        assert!(matches!(parse(b"<a/><b/>"), Err(Error::Document(_))));
    }
}
