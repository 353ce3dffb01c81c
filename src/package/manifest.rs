//! Output package manifest.
//!
//! The manifest lists every file of the output package with its content
//! type. It is always regenerated from the final entry set and always lists
//! itself last.

use crate::common::xml::{XmlDocument, escape_xml};
use crate::common::Result;
use crate::package::constants::{content_type, namespace, path};
use crate::package::entries::{EntryOrigin, OutputEntries};
use crate::package::entry_path::EntryPath;
use std::collections::HashSet;

/// Entry in the package manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub file_name: String,
    pub content_type: String,
}

/// Package manifest (`manifest.xml`)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    /// Build the manifest for a final entry set.
    ///
    /// In withdrawal mode the delivery documents of information objects are
    /// written into the package but left out of the listing.
    pub fn build(entries: &OutputEntries, withdrawal: bool) -> Self {
        let names = entries.iter().filter_map(|entry| {
            let hidden = withdrawal
                && entry.origin == EntryOrigin::InformationObjectDocument
                && EntryPath::new(&entry.name).ext() == "xml";
            (!hidden).then_some(entry.name.as_str())
        });
        Self::from_names(names)
    }

    /// Build a manifest listing `names` in order, deduplicated ignoring case.
    pub fn from_names<'a, I>(names: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut seen = HashSet::new();
        let mut entries = Vec::new();

        for name in names {
            if name.eq_ignore_ascii_case(path::MANIFEST) {
                continue;
            }
            if !seen.insert(name.to_ascii_lowercase()) {
                continue;
            }
            entries.push(ManifestEntry {
                file_name: name.to_string(),
                content_type: guess_content_type(name).to_string(),
            });
        }

        entries.push(ManifestEntry {
            file_name: path::MANIFEST.to_string(),
            content_type: content_type::XML.to_string(),
        });

        Self { entries }
    }

    /// Parse a manifest document.
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let doc = XmlDocument::parse(xml)?;
        let entries = doc
            .root()
            .child_elements()
            .filter(|e| e.local_name() == "bestand")
            .map(|file| ManifestEntry {
                file_name: file
                    .find_local("bestandsnaam")
                    .map(|e| e.text().trim().to_string())
                    .unwrap_or_default(),
                content_type: file
                    .find_local("contentType")
                    .map(|e| e.text().trim().to_string())
                    .unwrap_or_default(),
            })
            .collect();
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    /// Listed file names, in order.
    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.file_name.as_str())
    }

    /// Content type listed for a file.
    pub fn content_type_of(&self, file_name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.file_name.eq_ignore_ascii_case(file_name))
            .map(|entry| entry.content_type.as_str())
    }

    /// Generate the manifest.xml content
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(128 + self.entries.len() * 128);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        xml.push_str(&format!(r#"<lvbb:manifest xmlns:lvbb="{}">"#, namespace::LVBB));
        xml.push('\n');

        for entry in &self.entries {
            xml.push_str("  <lvbb:bestand>\n");
            xml.push_str(&format!(
                "    <lvbb:bestandsnaam>{}</lvbb:bestandsnaam>\n",
                escape_xml(&entry.file_name)
            ));
            xml.push_str(&format!(
                "    <lvbb:contentType>{}</lvbb:contentType>\n",
                escape_xml(&entry.content_type)
            ));
            xml.push_str("  </lvbb:bestand>\n");
        }

        xml.push_str("</lvbb:manifest>\n");
        xml
    }
}

/// Guess the content type from a file name's extension.
pub fn guess_content_type(file_name: &str) -> &'static str {
    let ext = EntryPath::new(file_name).ext();
    content_type::BY_EXTENSION
        .get(ext.as_str())
        .copied()
        .unwrap_or(content_type::OCTET_STREAM)
}
