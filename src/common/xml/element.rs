//! Owned XML element tree with namespace resolution.
//!
//! Source documents in a package are small, so they are parsed completely
//! into a tree. Element names keep the prefix they were written with and
//! carry the namespace URI that prefix resolved to, which allows both exact
//! namespace-qualified lookups and lenient local-name lookups.
//!
//! Attributes are kept in document order (namespace declarations included),
//! so serializing a parsed document is deterministic.

use super::escape::{escape_xml, resolve_entity, unescape_xml};
use crate::common::{Error, Result};
use quick_xml::NsReader;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;

/// A node inside an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    CData(String),
    Comment(String),
}

/// An XML element with its resolved namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    namespace: Option<String>,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    /// Create an element without namespace.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            namespace: None,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Create an element whose (possibly prefixed) name resolves to `namespace`.
    pub fn with_namespace(name: &str, namespace: &str) -> Self {
        Self {
            namespace: Some(namespace.to_string()),
            ..Self::new(name)
        }
    }

    /// Create an element holding a single text node.
    pub fn text_element(name: &str, namespace: &str, text: &str) -> Self {
        let mut element = Self::with_namespace(name, namespace);
        element.push_text(text);
        element
    }

    /// Name as written, including any prefix.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Local name (without prefix).
    pub fn local_name(&self) -> &str {
        match self.name.split_once(':') {
            Some((_, local)) => local,
            None => &self.name,
        }
    }

    /// Prefix as written, if any.
    pub fn prefix(&self) -> Option<&str> {
        self.name.split_once(':').map(|(prefix, _)| prefix)
    }

    /// Resolved namespace URI.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Exact namespace-qualified match.
    pub fn is(&self, namespace: &str, local_name: &str) -> bool {
        self.namespace.as_deref() == Some(namespace) && self.local_name() == local_name
    }

    /// Attribute value by name as written.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Attribute value by local name, ignoring prefix and ASCII case.
    pub fn attribute_local(&self, local_name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| {
                let local = key.rsplit(':').next().unwrap_or(key);
                !key.starts_with("xmlns") && local.eq_ignore_ascii_case(local_name)
            })
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute, replacing an existing one in place.
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        match self.attributes.iter_mut().find(|(key, _)| key == name) {
            Some(slot) => slot.1 = value.to_string(),
            None => self.attributes.push((name.to_string(), value.to_string())),
        }
    }

    /// All attributes in document order.
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Prefix declared on this element for `namespace`.
    ///
    /// Returns `Some("")` for a default namespace declaration.
    pub fn declared_prefix(&self, namespace: &str) -> Option<&str> {
        self.attributes.iter().find_map(|(key, value)| {
            if value != namespace {
                return None;
            }
            if key == "xmlns" {
                Some("")
            } else {
                key.strip_prefix("xmlns:")
            }
        })
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut Vec<Node> {
        &mut self.children
    }

    /// Direct child elements.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            _ => None,
        })
    }

    /// Direct child elements, mutably.
    pub fn child_elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            _ => None,
        })
    }

    pub fn push_child(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    pub fn push_text(&mut self, text: &str) {
        if let Some(Node::Text(last)) = self.children.last_mut() {
            last.push_str(text);
        } else {
            self.children.push(Node::Text(text.to_string()));
        }
    }

    /// Replace all children with a single text node.
    pub fn set_text(&mut self, text: &str) {
        self.children.clear();
        self.children.push(Node::Text(text.to_string()));
    }

    /// Concatenated text of this element and all descendants.
    pub fn text(&self) -> String {
        let mut text = String::new();
        self.collect_text(&mut text);
        text
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(text) | Node::CData(text) => out.push_str(text),
                Node::Element(element) => element.collect_text(out),
                Node::Comment(_) => {},
            }
        }
    }

    /// Pre-order iterator over this element and all descendant elements.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// First element (self included) with the exact namespace and local name.
    pub fn find(&self, namespace: &str, local_name: &str) -> Option<&Element> {
        self.descendants().find(|e| e.is(namespace, local_name))
    }

    /// First element (self included) whose local name matches ignoring ASCII case.
    pub fn find_local(&self, local_name: &str) -> Option<&Element> {
        self.descendants()
            .find(|e| e.local_name().eq_ignore_ascii_case(local_name))
    }

    /// Copy of this element and its descendants moved into another namespace.
    ///
    /// Every element gets `prefix` and `namespace`; namespace declarations of
    /// the source are dropped, other attributes are kept.
    pub fn rebased(&self, prefix: &str, namespace: &str) -> Element {
        let name = if prefix.is_empty() {
            self.local_name().to_string()
        } else {
            format!("{prefix}:{}", self.local_name())
        };
        Element {
            name,
            namespace: Some(namespace.to_string()),
            attributes: self
                .attributes
                .iter()
                .filter(|(key, _)| key != "xmlns" && !key.starts_with("xmlns:"))
                .cloned()
                .collect(),
            children: self
                .children
                .iter()
                .map(|node| match node {
                    Node::Element(element) => Node::Element(element.rebased(prefix, namespace)),
                    other => other.clone(),
                })
                .collect(),
        }
    }

    /// Serialize to an XML fragment.
    pub fn to_xml_string(&self) -> String {
        let mut xml = String::with_capacity(256);
        self.write_xml(&mut xml);
        xml
    }

    pub(crate) fn write_xml(&self, output: &mut String) {
        output.push('<');
        output.push_str(&self.name);
        for (key, value) in &self.attributes {
            output.push(' ');
            output.push_str(key);
            output.push_str("=\"");
            output.push_str(&escape_xml(value));
            output.push('"');
        }

        if self.children.is_empty() {
            output.push_str("/>");
            return;
        }

        output.push('>');
        for child in &self.children {
            match child {
                Node::Element(element) => element.write_xml(output),
                Node::Text(text) => output.push_str(&escape_xml(text)),
                Node::CData(text) => {
                    output.push_str("<![CDATA[");
                    output.push_str(text);
                    output.push_str("]]>");
                },
                Node::Comment(text) => {
                    output.push_str("<!--");
                    output.push_str(text);
                    output.push_str("-->");
                },
            }
        }
        output.push_str("</");
        output.push_str(&self.name);
        output.push('>');
    }
}

/// Iterator returned by [`Element::descendants`].
pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        let before = self.stack.len();
        self.stack.extend(current.child_elements());
        self.stack[before..].reverse();
        Some(current)
    }
}

/// A parsed XML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    root: Element,
}

impl XmlDocument {
    pub fn new(root: Element) -> Self {
        Self { root }
    }

    /// Parse a complete document.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let mut reader = NsReader::from_reader(bytes);
        let mut buf = Vec::new();
        let mut stack: Vec<Element> = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(ref e) => {
                    let element = Self::element_from_start(&reader, e)?;
                    stack.push(element);
                },
                Event::Empty(ref e) => {
                    let element = Self::element_from_start(&reader, e)?;
                    match stack.last_mut() {
                        Some(parent) => parent.push_child(element),
                        None => return Ok(Self::new(element)),
                    }
                },
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| Error::XmlError("unbalanced end tag".to_string()))?;
                    match stack.last_mut() {
                        Some(parent) => parent.push_child(element),
                        None => return Ok(Self::new(element)),
                    }
                },
                Event::Text(ref t) => {
                    if let Some(current) = stack.last_mut() {
                        let raw = std::str::from_utf8(t.as_ref())?;
                        current.push_text(&unescape_xml(raw));
                    }
                },
                Event::GeneralRef(ref r) => {
                    if let Some(current) = stack.last_mut() {
                        let name = std::str::from_utf8(r.as_ref())?;
                        current.push_text(&resolve_entity(name));
                    }
                },
                Event::CData(ref c) => {
                    if let Some(current) = stack.last_mut() {
                        let text = std::str::from_utf8(c.as_ref())?;
                        current.children.push(Node::CData(text.to_string()));
                    }
                },
                Event::Comment(ref c) => {
                    if let Some(current) = stack.last_mut() {
                        let text = std::str::from_utf8(c.as_ref())?;
                        current.children.push(Node::Comment(text.to_string()));
                    }
                },
                Event::Eof => break,
                _ => {},
            }
            buf.clear();
        }

        Err(Error::XmlError("no root element found".to_string()))
    }

    fn element_from_start(reader: &NsReader<&[u8]>, e: &BytesStart<'_>) -> Result<Element> {
        let name = std::str::from_utf8(e.name().as_ref())?.to_string();
        let namespace = match reader.resolver().resolve_element(e.name()).0 {
            ResolveResult::Bound(ns) => Some(std::str::from_utf8(ns.as_ref())?.to_string()),
            _ => None,
        };

        let mut attributes = Vec::new();
        for attr in e.attributes() {
            let attr = attr?;
            let key = std::str::from_utf8(attr.key.as_ref())?.to_string();
            let value = attr.unescape_value()?.to_string();
            attributes.push((key, value));
        }

        Ok(Element {
            name,
            namespace,
            attributes,
            children: Vec::new(),
        })
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Element {
        &mut self.root
    }

    pub fn into_root(self) -> Element {
        self.root
    }

    /// Serialize with a UTF-8 XML declaration.
    pub fn to_xml_string(&self) -> String {
        let mut xml = String::with_capacity(1024);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        self.root.write_xml(&mut xml);
        xml.push('\n');
        xml
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_xml_string().into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATA_NS: &str = "https://standaarden.overheid.nl/stop/imop/data/";

    #[test]
    fn test_parse_resolves_prefixed_and_default_namespaces() {
        let xml = br#"<?xml version="1.0"?>
<data:RegelingMetadata xmlns:data="https://standaarden.overheid.nl/stop/imop/data/">
  <data:maker>/tooi/id/gemeente/gm0001</data:maker>
  <soortRegeling xmlns="urn:other">x</soortRegeling>
</data:RegelingMetadata>"#;
        let doc = XmlDocument::parse(xml).unwrap();
        let maker = doc.root().find(DATA_NS, "maker").unwrap();
        assert_eq!(maker.text().trim(), "/tooi/id/gemeente/gm0001");
        assert_eq!(maker.prefix(), Some("data"));

        let other = doc.root().find_local("SOORTREGELING").unwrap();
        assert_eq!(other.namespace(), Some("urn:other"));
        assert!(doc.root().find(DATA_NS, "soortRegeling").is_none());
    }

    #[test]
    fn test_entities_are_resolved_and_re_escaped() {
        let doc = XmlDocument::parse(br#"<a t="x &amp; y">Tom &amp; Jerry &#235;</a>"#).unwrap();
        assert_eq!(doc.root().attribute("t"), Some("x & y"));
        assert_eq!(doc.root().text(), "Tom & Jerry ë");
        assert!(doc.to_xml_string().contains("Tom &amp; Jerry ë"));
    }

    #[test]
    fn test_descendants_are_pre_order() {
        let doc = XmlDocument::parse(b"<a><b><c/></b><d/></a>").unwrap();
        let names: Vec<_> = doc.root().descendants().map(|e| e.name().to_string()).collect();
        assert_eq!(names, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_serialization_keeps_attribute_order() {
        let xml = r#"<r z="1" a="2" m="3"><x/></r>"#;
        let doc = XmlDocument::parse(xml.as_bytes()).unwrap();
        assert_eq!(doc.root().to_xml_string(), xml);
    }

    #[test]
    fn test_rebased_moves_whole_subtree() {
        let doc = XmlDocument::parse(
            br#"<m:Meta xmlns:m="urn:m"><m:onderwerpen><m:onderwerp>a</m:onderwerp></m:onderwerpen></m:Meta>"#,
        )
        .unwrap();
        let moved = doc.root().rebased("data", DATA_NS);
        assert_eq!(moved.name(), "data:Meta");
        assert!(moved.attribute("xmlns:m").is_none());
        assert!(moved.find(DATA_NS, "onderwerp").is_some());
        assert_eq!(
            moved.to_xml_string(),
            "<data:Meta><data:onderwerpen><data:onderwerp>a</data:onderwerp></data:onderwerpen></data:Meta>"
        );
    }

    #[test]
    fn test_declared_prefix() {
        let doc = XmlDocument::parse(br#"<r xmlns="urn:a" xmlns:b="urn:b"/>"#).unwrap();
        assert_eq!(doc.root().declared_prefix("urn:a"), Some(""));
        assert_eq!(doc.root().declared_prefix("urn:b"), Some("b"));
        assert_eq!(doc.root().declared_prefix("urn:c"), None);
    }

    #[test]
    fn test_malformed_document_is_an_error() {
        assert!(XmlDocument::parse(b"").is_err());
        assert!(XmlDocument::parse(b"<a><b></a>").is_err());
    }
}
