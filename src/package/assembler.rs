//! Output entry assembly.
//!
//! Generated documents claim their names first, then the rewritten
//! geo-object files, then whatever the copy policy keeps of the source
//! package in archive order. Every name is taken at most once (ignoring
//! ASCII case); a later entry with a taken name is skipped. A fresh
//! geo-object inventory closes the set whenever geo-object files were copied.

use crate::analysis::ArchiveAnalysis;
use crate::common::xml::{XmlDocument, XmlWriter};
use crate::package::constants::{element, namespace, path};
use crate::package::entries::{EntryOrigin, OutputEntries};
use crate::package::entry_path::EntryPath;
use crate::package::source::SourcePackage;
use crate::scenario::{Scenario, ScenarioResult};

/// What happens to one source entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// Copied under `name`
    Keep { name: String, origin: EntryOrigin },
    /// Left out
    Drop(&'static str),
}

/// Copy policy for one source entry.
pub fn place(entry: EntryPath<'_>, scenario: Scenario) -> Placement {
    if entry.is_dir_marker() {
        return Placement::Drop("directory marker");
    }

    let file_name = entry.file_name();
    if file_name.eq_ignore_ascii_case(path::PACKING_LIST) {
        return Placement::Drop("packing list");
    }
    if file_name.eq_ignore_ascii_case(path::MANIFEST) {
        return Placement::Drop("package manifest is regenerated");
    }
    if entry.is_geo_object_manifest() {
        return Placement::Drop("geo-object inventory is regenerated");
    }

    if entry.is_information_object() {
        if scenario.is_withdrawal() {
            return Placement::Drop("information objects are not delivered on withdrawal");
        }
        if entry.is_io_metadata_only() {
            return Placement::Drop("information-object metadata");
        }
        if !entry.is_payload() {
            return Placement::Drop("not an information-object payload");
        }
        return Placement::Keep {
            name: file_name.to_string(),
            origin: EntryOrigin::InformationObjectPayload,
        };
    }

    if entry.is_regulation() {
        if !entry.is_image() {
            return Placement::Drop("regulation document");
        }
        return Placement::Keep {
            name: file_name.to_string(),
            origin: EntryOrigin::RegulationImage,
        };
    }

    if entry.is_geo_object() {
        return Placement::Keep {
            name: geo_target_name(entry, scenario),
            origin: EntryOrigin::GeoObject,
        };
    }

    Placement::Keep {
        name: file_name.to_string(),
        origin: EntryOrigin::Other,
    }
}

/// Output name of a geo-object file: its bare name, mapped through the
/// scenario's rename table.
pub fn geo_target_name(entry: EntryPath<'_>, scenario: Scenario) -> String {
    let file_name = entry.file_name();
    scenario
        .geo_renames()
        .get(file_name.to_ascii_lowercase().as_str())
        .map_or_else(|| file_name.to_string(), |renamed| (*renamed).to_string())
}

/// Assemble the output entry set.
pub fn assemble(
    source: &SourcePackage,
    result: &ScenarioResult,
    analysis: &ArchiveAnalysis,
) -> OutputEntries {
    let scenario = result.scenario;
    let mut entries = OutputEntries::new();

    for document in &result.documents {
        entries.push(document.name.clone(), document.content.clone(), document.origin);
    }

    for file in &result.modified {
        let name = geo_target_name(EntryPath::new(&file.source_name), scenario);
        entries.push(name, file.content.clone(), EntryOrigin::GeoObject);
    }

    for entry in source.entries() {
        match place(entry.path(), scenario) {
            Placement::Keep { .. }
                if result.modified.iter().any(|m| m.source_name == entry.name()) =>
            {
                tracing::debug!(entry = entry.name(), "replaced by rewritten file");
            },
            Placement::Keep { name, origin } => {
                if !entries.push(name.clone(), entry.data().to_vec(), origin) {
                    tracing::warn!(entry = entry.name(), target = %name, "target name already taken, entry skipped");
                }
            },
            Placement::Drop(reason) => {
                tracing::debug!(entry = entry.name(), reason, "entry dropped");
            },
        }
    }

    if let Some(inventory) = geo_object_inventory(&entries, analysis, &result.goal_id) {
        entries.push(path::GEO_OBJECT_MANIFEST, inventory, EntryOrigin::GeoObjectManifest);
    }

    tracing::debug!(entries = entries.len(), "output entries assembled");
    entries
}

/// Object types (local names of domain objects) of a geo-object file, in
/// first-seen order.
pub fn object_types(content: &[u8]) -> Vec<String> {
    let Ok(doc) = XmlDocument::parse(content) else {
        return Vec::new();
    };
    let mut types: Vec<String> = Vec::new();
    for container in doc
        .root()
        .descendants()
        .filter(|e| e.local_name() == element::OW_OBJECT)
    {
        for object in container.child_elements() {
            if !types.iter().any(|t| t == object.local_name()) {
                types.push(object.local_name().to_string());
            }
        }
    }
    types
}

/// Build the geo-object inventory, or `None` when no geo-object files are
/// part of the output.
pub fn geo_object_inventory(
    entries: &OutputEntries,
    analysis: &ArchiveAnalysis,
    goal_id: &str,
) -> Option<Vec<u8>> {
    let files: Vec<_> = entries
        .iter()
        .filter(|entry| entry.origin == EntryOrigin::GeoObject)
        .collect();
    if files.is_empty() {
        return None;
    }

    let mut w = XmlWriter::new();
    w.open(
        "Aanleveringen",
        &[("xmlns", namespace::MANIFEST_OW), ("domein", "omgevingswet")],
    );
    w.open("Aanlevering", &[])
        .leaf_opt("WorkIDRegeling", analysis.work_id.as_deref())
        .leaf("DoelID", goal_id);
    for file in files {
        w.open("Bestand", &[]).leaf("naam", &file.name);
        for object_type in object_types(&file.content) {
            w.leaf("objecttype", &object_type);
        }
        w.close();
    }
    Some(w.finish())
}
