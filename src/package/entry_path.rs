/// Provides the EntryPath value type for classifying archive entry names.
///
/// Entry names in a source package are relative, slash-separated paths such as
/// `IO-001/Identificatie.xml` or `OW-bestanden/locaties.xml`. Every folder and
/// file convention is matched ASCII case-insensitively, because authoring tools
/// disagree on casing.
use super::constants::{extension, path};

/// A borrowed archive entry name with classification helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryPath<'a> {
    name: &'a str,
}

impl<'a> EntryPath<'a> {
    pub fn new(name: &'a str) -> Self {
        Self { name }
    }

    /// The full entry name.
    pub fn as_str(&self) -> &'a str {
        self.name
    }

    /// Whether the entry is a directory marker (`folder/`).
    pub fn is_dir_marker(&self) -> bool {
        self.name.ends_with('/') || self.name.ends_with('\\')
    }

    /// The last path segment.
    ///
    /// For example, "gebied.gml" for "IO-001/gebied.gml".
    pub fn file_name(&self) -> &'a str {
        let trimmed = self.name.trim_end_matches(['/', '\\']);
        match trimmed.rfind(['/', '\\']) {
            Some(pos) => &trimmed[pos + 1..],
            None => trimmed,
        }
    }

    /// The lowercase extension of the file name, without the dot.
    pub fn ext(&self) -> String {
        let file_name = self.file_name();
        match file_name.rfind('.') {
            Some(pos) if pos + 1 < file_name.len() => file_name[pos + 1..].to_ascii_lowercase(),
            _ => String::new(),
        }
    }

    /// The first path segment, or `None` for a root-level entry.
    pub fn first_segment(&self) -> Option<&'a str> {
        self.name.split_once('/').map(|(first, _)| first)
    }

    /// Whether the entry name starts with `prefix`, ignoring ASCII case.
    pub fn starts_with_ci(&self, prefix: &str) -> bool {
        self.name.len() >= prefix.len()
            && self.name.is_char_boundary(prefix.len())
            && self.name[..prefix.len()].eq_ignore_ascii_case(prefix)
    }

    /// Whether the entry lives in an information-object folder.
    pub fn is_information_object(&self) -> bool {
        self.information_object_folder().is_some()
    }

    /// Name of the information-object folder holding this entry.
    pub fn information_object_folder(&self) -> Option<&'a str> {
        let folder = self.first_segment()?;
        EntryPath::new(folder)
            .starts_with_ci(path::IO_FOLDER_PREFIX)
            .then_some(folder)
    }

    /// Whether the entry lives in the regulation folder.
    pub fn is_regulation(&self) -> bool {
        self.starts_with_ci(path::REGULATION_FOLDER)
    }

    /// Whether the entry lives in the geo-object folder.
    pub fn is_geo_object_folder(&self) -> bool {
        self.starts_with_ci(path::GEO_OBJECT_FOLDER)
    }

    /// Whether the entry carries geo-object data: it lives in the geo-object
    /// folder or has an `OW` segment anywhere in its path.
    pub fn is_geo_object(&self) -> bool {
        if self.is_geo_object_folder() {
            return true;
        }
        let segment = path::GEO_OBJECT_SEGMENT;
        let rooted = format!("/{}", self.name);
        rooted
            .to_ascii_lowercase()
            .contains(&segment.to_ascii_lowercase())
    }

    /// Whether the file name is the geo-object inventory.
    pub fn is_geo_object_manifest(&self) -> bool {
        self.file_name().eq_ignore_ascii_case(path::GEO_OBJECT_MANIFEST)
    }

    pub fn is_image(&self) -> bool {
        let ext = self.ext();
        extension::IMAGES.contains(&ext.as_str())
    }

    /// Whether the extension marks a geographic payload.
    pub fn is_geographic(&self) -> bool {
        self.ext() == extension::GEOGRAPHIC
    }

    /// Whether the extension marks an information-object payload.
    pub fn is_payload(&self) -> bool {
        let ext = self.ext();
        extension::PAYLOAD_PRIORITY.contains(&ext.as_str())
    }

    /// Whether the file only describes an information object.
    pub fn is_io_metadata_only(&self) -> bool {
        let file_name = self.file_name();
        path::IO_METADATA_ONLY
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(file_name))
    }
}

impl std::fmt::Display for EntryPath<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}
