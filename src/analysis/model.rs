//! Analysis result types.
//!
//! [`ArchiveAnalysis`] is immutable. It is produced once by
//! [`AnalysisBuilder::finish`], after all records have been built and the
//! cross-reference resolution has been merged in.

use std::collections::HashMap;

/// Authority that made the regulation, taken from the maker path
/// `/tooi/id/{type}/{code}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authority {
    /// Government tier, one of the recognised authority types
    pub kind: String,
    /// Authority code as written, e.g. `gm0001`
    pub code: String,
}

/// One information object (annex) of the source package.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InformationObjectRecord {
    /// Folder name, unique within an analysis (ignoring ASCII case)
    pub folder: String,
    pub work_id: Option<String>,
    pub expression_id: Option<String>,
    /// `eId` of the reference in the regulation text pointing at this object
    pub reference_element_id: Option<String>,
    /// Bare file name of the payload
    pub payload_file: Option<String>,
    /// Lowercase hex SHA-512 of the payload
    pub digest: Option<String>,
    pub title: Option<String>,
}

impl InformationObjectRecord {
    pub fn new(folder: impl Into<String>) -> Self {
        Self {
            folder: folder.into(),
            ..Self::default()
        }
    }

    /// Title, falling back to the folder name.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.folder)
    }
}

/// Reference from the regulation text to an information object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalReference {
    /// Target reference: an expression or work identifier
    pub reference: String,
    pub element_id: Option<String>,
}

/// Everything the scenario processors need to know about a source package.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveAnalysis {
    pub work_id: Option<String>,
    pub expression_id: Option<String>,
    /// Stated goal of the snapshot
    pub goal: Option<String>,
    pub authority: Option<Authority>,
    /// Official title of the regulation
    pub title: Option<String>,
    pub geo_payload_count: usize,
    pub geo_payload_bytes: u64,
    pub information_objects: Vec<InformationObjectRecord>,
    pub references: Vec<ExternalReference>,
}

impl ArchiveAnalysis {
    pub fn authority_code(&self) -> Option<&str> {
        self.authority.as_ref().map(|a| a.code.as_str())
    }

    /// Record of an information-object folder, ignoring ASCII case.
    pub fn information_object(&self, folder: &str) -> Option<&InformationObjectRecord> {
        self.information_objects
            .iter()
            .find(|record| record.folder.eq_ignore_ascii_case(folder))
    }
}

/// Accumulates analysis results; [`finish`](Self::finish) produces the
/// immutable [`ArchiveAnalysis`].
#[derive(Debug, Default)]
pub struct AnalysisBuilder {
    analysis: ArchiveAnalysis,
    resolutions: HashMap<String, String>,
}

impl AnalysisBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn work_id(&mut self, value: Option<String>) -> &mut Self {
        self.analysis.work_id = value;
        self
    }

    pub fn expression_id(&mut self, value: Option<String>) -> &mut Self {
        self.analysis.expression_id = value;
        self
    }

    pub fn goal(&mut self, value: Option<String>) -> &mut Self {
        self.analysis.goal = value;
        self
    }

    pub fn authority(&mut self, value: Option<Authority>) -> &mut Self {
        self.analysis.authority = value;
        self
    }

    pub fn title(&mut self, value: Option<String>) -> &mut Self {
        self.analysis.title = value;
        self
    }

    /// Count one geographic payload of `bytes` bytes.
    pub fn add_geo_payload(&mut self, bytes: u64) -> &mut Self {
        self.analysis.geo_payload_count += 1;
        self.analysis.geo_payload_bytes += bytes;
        self
    }

    /// Add a record; a folder that is already present is ignored.
    pub fn add_information_object(&mut self, record: InformationObjectRecord) -> &mut Self {
        if self.analysis.information_object(&record.folder).is_none() {
            self.analysis.information_objects.push(record);
        }
        self
    }

    pub fn add_reference(&mut self, reference: ExternalReference) -> &mut Self {
        self.analysis.references.push(reference);
        self
    }

    pub fn records(&self) -> &[InformationObjectRecord] {
        &self.analysis.information_objects
    }

    pub fn references(&self) -> &[ExternalReference] {
        &self.analysis.references
    }

    /// Install the resolution map (lowercase folder name to element id)
    /// applied by [`finish`](Self::finish).
    pub fn resolutions(&mut self, resolutions: HashMap<String, String>) -> &mut Self {
        self.resolutions = resolutions;
        self
    }

    /// Merge the resolution map into the records and freeze the analysis.
    pub fn finish(self) -> ArchiveAnalysis {
        let Self {
            mut analysis,
            resolutions,
        } = self;
        for record in &mut analysis.information_objects {
            if let Some(element_id) = resolutions.get(&record.folder.to_ascii_lowercase()) {
                record.reference_element_id = Some(element_id.clone());
            }
        }
        analysis
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_folders_are_ignored() {
        let mut builder = AnalysisBuilder::new();
        builder
            .add_information_object(InformationObjectRecord::new("IO-1"))
            .add_information_object(InformationObjectRecord::new("io-1"));
        assert_eq!(builder.finish().information_objects.len(), 1);
    }

    #[test]
    fn test_finish_merges_resolutions() {
        let mut builder = AnalysisBuilder::new();
        builder
            .add_information_object(InformationObjectRecord::new("IO-1"))
            .add_information_object(InformationObjectRecord::new("IO-2"));
        builder.resolutions(HashMap::from([("io-2".to_string(), "art_1__ref_o_1".to_string())]));

        let analysis = builder.finish();
        assert_eq!(analysis.information_objects[0].reference_element_id, None);
        assert_eq!(
            analysis.information_object("io-2").unwrap().reference_element_id.as_deref(),
            Some("art_1__ref_o_1")
        );
    }

    #[test]
    fn test_geo_payload_totals() {
        let mut builder = AnalysisBuilder::new();
        builder.add_geo_payload(10).add_geo_payload(32);
        let analysis = builder.finish();
        assert_eq!(analysis.geo_payload_count, 2);
        assert_eq!(analysis.geo_payload_bytes, 42);
    }
}
