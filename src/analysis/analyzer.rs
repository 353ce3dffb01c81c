//! Source package analysis.
//!
//! Every document the analyzer looks at is optional. A missing or malformed
//! document leaves the fields it would have supplied empty; analysis itself
//! never fails once the archive has been read.

use super::model::{AnalysisBuilder, ArchiveAnalysis, Authority, InformationObjectRecord};
use super::references;
use crate::common::xml::{Element, XmlDocument};
use crate::package::constants::{AUTHORITY_TYPES, element, extension, namespace, path};
use crate::package::source::{SourceEntry, SourcePackage};
use sha2::{Digest, Sha512};

/// Analyze a source package.
pub fn analyze(package: &SourcePackage) -> ArchiveAnalysis {
    let mut builder = AnalysisBuilder::new();

    let identification = load(package, path::IDENTIFICATION);
    let snapshot = load(package, path::SNAPSHOT);
    let metadata = load(package, path::METADATA);
    let free_text = load(package, path::FREE_TEXT);

    builder
        .work_id(lookup(identification.as_ref(), namespace::STOP_DATA, element::WORK))
        .expression_id(lookup(identification.as_ref(), namespace::STOP_DATA, element::EXPRESSION))
        .goal(lookup(snapshot.as_ref(), namespace::STOP_DATA, element::GOAL))
        .title(lookup(metadata.as_ref(), namespace::STOP_DATA, element::OFFICIAL_TITLE))
        .authority(
            lookup(metadata.as_ref(), namespace::STOP_DATA, element::MAKER)
                .as_deref()
                .and_then(parse_authority),
        );

    for folder in information_object_folders(package) {
        let files: Vec<&SourceEntry> = package
            .files()
            .filter(|entry| {
                entry
                    .path()
                    .information_object_folder()
                    .is_some_and(|f| f.eq_ignore_ascii_case(&folder))
            })
            .collect();

        for entry in files.iter().filter(|entry| entry.path().is_geographic()) {
            builder.add_geo_payload(entry.len());
        }

        builder.add_information_object(build_record(package, &folder, &files));
    }

    if let Some(text) = free_text.as_ref() {
        for reference in references::collect_references(text.root()) {
            builder.add_reference(reference);
        }
    }

    let resolutions = references::resolve(builder.records(), builder.references());
    builder.resolutions(resolutions);

    let analysis = builder.finish();
    tracing::info!(
        work = analysis.work_id.as_deref().unwrap_or("-"),
        authority = analysis.authority_code().unwrap_or("-"),
        information_objects = analysis.information_objects.len(),
        references = analysis.references.len(),
        geo_payload_bytes = analysis.geo_payload_bytes,
        "analyzed source package"
    );
    analysis
}

/// Parse an optional document; absent or malformed documents yield `None`.
pub fn load(package: &SourcePackage, name: &str) -> Option<XmlDocument> {
    let entry = package.find(name)?;
    match XmlDocument::parse(entry.data()) {
        Ok(doc) => Some(doc),
        Err(err) => {
            tracing::warn!(document = name, error = %err, "ignoring unreadable document");
            None
        },
    }
}

/// Trimmed text of the first matching element.
///
/// The exact namespace-qualified name is tried first; if nothing matches, the
/// first element with the same local name (ignoring ASCII case) is taken.
pub fn lookup(doc: Option<&XmlDocument>, ns: &str, local_name: &str) -> Option<String> {
    let root = doc?.root();
    let found = root
        .find(ns, local_name)
        .or_else(|| root.find_local(local_name))?;
    non_empty(found)
}

fn non_empty(element: &Element) -> Option<String> {
    let text = element.text();
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Split a maker path such as `/tooi/id/gemeente/gm0001` into authority type
/// and code. Unknown authority types yield `None`.
pub fn parse_authority(maker: &str) -> Option<Authority> {
    let mut segments = maker.trim().trim_end_matches('/').rsplit('/');
    let code = segments.next().map(str::trim).filter(|s| !s.is_empty())?;
    let kind = segments.next().map(str::trim).filter(|s| !s.is_empty())?;

    let known = AUTHORITY_TYPES
        .iter()
        .find(|candidate| candidate.eq_ignore_ascii_case(kind))?;

    Some(Authority {
        kind: (*known).to_string(),
        code: code.to_string(),
    })
}

/// Information-object folder names, deduplicated and sorted ignoring ASCII case.
pub fn information_object_folders(package: &SourcePackage) -> Vec<String> {
    let mut folders: Vec<String> = Vec::new();
    for entry in package.entries() {
        if let Some(folder) = entry.path().information_object_folder()
            && !folders.iter().any(|f| f.eq_ignore_ascii_case(folder))
        {
            folders.push(folder.to_string());
        }
    }
    folders.sort_by_key(|folder| folder.to_ascii_lowercase());
    folders
}

fn build_record(package: &SourcePackage, folder: &str, files: &[&SourceEntry]) -> InformationObjectRecord {
    let identification = load(package, &format!("{folder}/{}", path::IO_IDENTIFICATION));
    let metadata = load(package, &format!("{folder}/{}", path::IO_METADATA));
    let version_metadata = load(package, &format!("{folder}/{}", path::IO_VERSION_METADATA));

    let title = lookup(metadata.as_ref(), namespace::STOP_DATA, element::OFFICIAL_TITLE)
        .or_else(|| lookup(version_metadata.as_ref(), namespace::STOP_DATA, element::OFFICIAL_TITLE));

    let mut record = InformationObjectRecord {
        work_id: lookup(identification.as_ref(), namespace::STOP_DATA, element::WORK),
        expression_id: lookup(identification.as_ref(), namespace::STOP_DATA, element::EXPRESSION),
        title,
        ..InformationObjectRecord::new(folder)
    };

    if let Some(payload) = select_payload(files) {
        record.payload_file = Some(payload.path().file_name().to_string());
        record.digest = Some(sha512_hex(payload.data()));
    }

    record
}

/// Primary payload of a folder: the first `.gml` file, else the first `.pdf`.
pub fn select_payload<'a>(files: &[&'a SourceEntry]) -> Option<&'a SourceEntry> {
    extension::PAYLOAD_PRIORITY.iter().find_map(|ext| {
        files
            .iter()
            .copied()
            .find(|entry| entry.path().ext() == *ext)
    })
}

/// Lowercase hex SHA-512 digest.
pub fn sha512_hex(data: &[u8]) -> String {
    hex::encode(Sha512::digest(data))
}
