//! Ordered output entry set.
//!
//! The set is the single source of truth for both the manifest and the
//! archive writer. Names are unique under ASCII case-insensitive comparison;
//! the first writer of a name wins and later writers are skipped.

use std::collections::HashSet;

/// Where an output entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryOrigin {
    /// Decision, submission order or consolidation document
    Generated,
    /// Delivery document generated for one information object
    InformationObjectDocument,
    /// Payload copied out of an information-object folder
    InformationObjectPayload,
    /// Image copied out of the regulation folder
    RegulationImage,
    /// Geo-object file, copied or rewritten
    GeoObject,
    /// Regenerated geo-object inventory
    GeoObjectManifest,
    /// Any other copied source entry
    Other,
}

/// One entry of the output package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputEntry {
    pub name: String,
    pub content: Vec<u8>,
    pub origin: EntryOrigin,
}

/// Ordered, case-insensitively deduplicated entries.
#[derive(Debug, Clone, Default)]
pub struct OutputEntries {
    entries: Vec<OutputEntry>,
    seen: HashSet<String>,
}

impl OutputEntries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry unless its name is already taken.
    ///
    /// Returns `true` if the entry was added.
    pub fn push(&mut self, name: impl Into<String>, content: Vec<u8>, origin: EntryOrigin) -> bool {
        let name = name.into();
        if !self.seen.insert(name.to_ascii_lowercase()) {
            tracing::debug!(name = %name, "skipping duplicate output entry");
            return false;
        }
        self.entries.push(OutputEntry {
            name,
            content,
            origin,
        });
        true
    }

    /// Whether `name` is taken, ignoring ASCII case.
    pub fn contains(&self, name: &str) -> bool {
        self.seen.contains(&name.to_ascii_lowercase())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OutputEntry> {
        self.entries.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&OutputEntry> {
        self.entries
            .iter()
            .find(|entry| entry.name.eq_ignore_ascii_case(name))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a OutputEntries {
    type Item = &'a OutputEntry;
    type IntoIter = std::slice::Iter<'a, OutputEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_first_writer_wins() {
        let mut entries = OutputEntries::new();
        assert!(entries.push("besluit.xml", b"first".to_vec(), EntryOrigin::Generated));
        assert!(!entries.push("BESLUIT.xml", b"second".to_vec(), EntryOrigin::Other));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries.get("besluit.XML").unwrap().content, b"first");
        assert_eq!(entries.get("besluit.xml").unwrap().origin, EntryOrigin::Generated);
    }

    #[test]
    fn test_order_is_insertion_order() {
        let mut entries = OutputEntries::new();
        for name in ["c.xml", "a.xml", "b.xml"] {
            entries.push(name, Vec::new(), EntryOrigin::Other);
        }
        assert_eq!(entries.names().collect::<Vec<_>>(), vec!["c.xml", "a.xml", "b.xml"]);
    }

    proptest! {
        #[test]
        fn prop_names_are_unique_ignoring_case(names in proptest::collection::vec("[a-cA-C]{1,3}\\.xml", 0..40)) {
            let mut entries = OutputEntries::new();
            for name in &names {
                entries.push(name.clone(), Vec::new(), EntryOrigin::Other);
            }
            let lowered: HashSet<_> = entries.names().map(|n| n.to_ascii_lowercase()).collect();
            prop_assert_eq!(lowered.len(), entries.len());
            for name in &names {
                prop_assert!(entries.contains(name));
            }
        }
    }
}
