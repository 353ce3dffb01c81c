//! Indented XML string builder for generated documents.
//!
//! Parsed trees are written back with [`Element::to_xml_string`]; documents
//! built from scratch use [`XmlWriter`], which lays them out one element per
//! line.

use super::{Element, escape_xml};

const INDENT: &str = "  ";

/// Builds a document element by element; every element is written on its own
/// line, indented by nesting depth.
#[derive(Debug)]
pub struct XmlWriter {
    output: String,
    open: Vec<String>,
}

impl Default for XmlWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl XmlWriter {
    pub fn new() -> Self {
        let mut output = String::with_capacity(4096);
        output.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        output.push('\n');
        Self {
            output,
            open: Vec::new(),
        }
    }

    fn indent(&mut self) {
        for _ in 0..self.open.len() {
            self.output.push_str(INDENT);
        }
    }

    fn start_tag(&mut self, name: &str, attributes: &[(&str, &str)]) {
        self.output.push('<');
        self.output.push_str(name);
        for (key, value) in attributes {
            self.output.push(' ');
            self.output.push_str(key);
            self.output.push_str("=\"");
            self.output.push_str(&escape_xml(value));
            self.output.push('"');
        }
    }

    /// Open an element; it stays open until [`close`](Self::close).
    pub fn open(&mut self, name: &str, attributes: &[(&str, &str)]) -> &mut Self {
        self.indent();
        self.start_tag(name, attributes);
        self.output.push_str(">\n");
        self.open.push(name.to_string());
        self
    }

    /// Close the innermost open element.
    pub fn close(&mut self) -> &mut Self {
        if let Some(name) = self.open.pop() {
            self.indent();
            self.output.push_str("</");
            self.output.push_str(&name);
            self.output.push_str(">\n");
        }
        self
    }

    /// Write an element with text content.
    pub fn leaf(&mut self, name: &str, text: &str) -> &mut Self {
        self.leaf_with(name, &[], text)
    }

    /// Write an element with attributes and text content.
    pub fn leaf_with(&mut self, name: &str, attributes: &[(&str, &str)], text: &str) -> &mut Self {
        self.indent();
        self.start_tag(name, attributes);
        self.output.push('>');
        self.output.push_str(&escape_xml(text));
        self.output.push_str("</");
        self.output.push_str(name);
        self.output.push_str(">\n");
        self
    }

    /// Write an element with text content if `text` is present.
    pub fn leaf_opt(&mut self, name: &str, text: Option<&str>) -> &mut Self {
        if let Some(text) = text {
            self.leaf(name, text);
        }
        self
    }

    /// Write a parsed element verbatim on one line.
    pub fn element(&mut self, element: &Element) -> &mut Self {
        self.indent();
        self.output.push_str(&element.to_xml_string());
        self.output.push('\n');
        self
    }

    /// Close every open element and return the document bytes.
    pub fn finish(mut self) -> Vec<u8> {
        while !self.open.is_empty() {
            self.close();
        }
        self.output.into_bytes()
    }
}
