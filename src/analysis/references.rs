//! Cross-references from the regulation text to information objects.
//!
//! Resolution is done in two passes: the records are built first and are
//! never touched here; this module only computes a map from folder name to
//! element id, which [`AnalysisBuilder::finish`](super::AnalysisBuilder::finish)
//! merges into the records.

use super::model::{ExternalReference, InformationObjectRecord};
use crate::common::xml::Element;
use crate::package::constants::element;
use std::collections::HashMap;

/// Collect the reference elements of a free-text document in document order.
///
/// Only elements carrying a target reference are collected; the element id
/// is optional.
pub fn collect_references(root: &Element) -> Vec<ExternalReference> {
    root.descendants()
        .filter(|e| e.local_name().eq_ignore_ascii_case(element::EXTERNAL_REFERENCE))
        .filter_map(|e| {
            let reference = e
                .attribute_local(element::REFERENCE_TARGET_ATTR)
                .map(str::trim)
                .filter(|value| !value.is_empty())?;
            let element_id = e
                .attribute_local(element::ELEMENT_ID_ATTR)
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string);
            Some(ExternalReference {
                reference: reference.to_string(),
                element_id,
            })
        })
        .collect()
}

/// Find the record a reference points at.
///
/// A match on the expression identifier takes priority over a match on the
/// work identifier; both comparisons ignore ASCII case.
pub fn match_record<'a>(
    records: &'a [InformationObjectRecord],
    reference: &str,
) -> Option<&'a InformationObjectRecord> {
    let matches = |id: &Option<String>| {
        id.as_deref()
            .is_some_and(|id| id.eq_ignore_ascii_case(reference))
    };
    records
        .iter()
        .find(|record| matches(&record.expression_id))
        .or_else(|| records.iter().find(|record| matches(&record.work_id)))
}

/// Compute the element id of every referenced record, keyed by lowercase
/// folder name.
///
/// When several references resolve to the same record the last one wins;
/// each override is logged.
pub fn resolve(
    records: &[InformationObjectRecord],
    references: &[ExternalReference],
) -> HashMap<String, String> {
    let mut resolved: HashMap<String, String> = HashMap::new();

    for reference in references {
        let Some(element_id) = reference.element_id.as_deref() else {
            continue;
        };
        let Some(record) = match_record(records, &reference.reference) else {
            tracing::debug!(reference = %reference.reference, "reference matches no information object");
            continue;
        };

        let key = record.folder.to_ascii_lowercase();
        if let Some(previous) = resolved.insert(key, element_id.to_string())
            && previous != element_id
        {
            tracing::warn!(
                folder = %record.folder,
                previous = %previous,
                current = %element_id,
                "several references resolve to one information object; keeping the last"
            );
        }
    }

    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::xml::XmlDocument;

    fn record(folder: &str, work: &str, expression: &str) -> InformationObjectRecord {
        InformationObjectRecord {
            work_id: Some(work.to_string()),
            expression_id: Some(expression.to_string()),
            ..InformationObjectRecord::new(folder)
        }
    }

    fn reference(token: &str, eid: &str) -> ExternalReference {
        ExternalReference {
            reference: token.to_string(),
            element_id: Some(eid.to_string()),
        }
    }

    #[test]
    fn test_collect_references_from_text() {
        let doc = XmlDocument::parse(
            br#"<tekst:Lichaam xmlns:tekst="https://standaarden.overheid.nl/stop/imop/tekst/">
  <tekst:Al>Zie <tekst:ExtIoRef ref="/join/id/regdata/gm0001/2025/kaart/nld@2025-01-01" eId="art_1__ref_o_1">kaart</tekst:ExtIoRef>.</tekst:Al>
  <tekst:Al><tekst:ExtIoRef eId="art_2__ref_o_1">zonder doel</tekst:ExtIoRef></tekst:Al>
  <tekst:Al><tekst:ExtIoRef ref="/join/id/regdata/gm0001/2025/bijlage">zonder eId</tekst:ExtIoRef></tekst:Al>
</tekst:Lichaam>"#,
        )
        .unwrap();
        let refs = collect_references(doc.root());
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].element_id.as_deref(), Some("art_1__ref_o_1"));
        assert_eq!(refs[1].element_id, None);
    }

    #[test]
    fn test_expression_match_sets_element_id() {
        let records = vec![record("IO-1", "/w/1", "E1")];
        let resolved = resolve(&records, &[reference("E1", "ref_1")]);
        assert_eq!(resolved.get("io-1").map(String::as_str), Some("ref_1"));
    }

    #[test]
    fn test_no_match_mutates_nothing() {
        let records = vec![record("IO-1", "/w/1", "E1")];
        assert!(resolve(&records, &[reference("E2", "ref_1")]).is_empty());
    }

    #[test]
    fn test_expression_match_beats_work_match() {
        let records = vec![record("IO-1", "X", "/e/1"), record("IO-2", "/w/2", "x")];
        let found = match_record(&records, "x").unwrap();
        assert_eq!(found.folder, "IO-2");
    }

    #[test]
    fn test_work_match_is_case_insensitive_fallback() {
        let records = vec![record("IO-1", "/join/id/regdata/GM0001/kaart", "/e/1")];
        let resolved = resolve(&records, &[reference("/join/id/regdata/gm0001/KAART", "r")]);
        assert_eq!(resolved.len(), 1);
    }

    #[test]
    fn test_last_reference_wins() {
        let records = vec![record("IO-1", "/w/1", "E1")];
        let resolved = resolve(
            &records,
            &[reference("E1", "first"), reference("/w/1", "second")],
        );
        assert_eq!(resolved.get("io-1").map(String::as_str), Some("second"));
    }
}
