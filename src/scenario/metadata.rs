//! Metadata block of generated documents.
//!
//! The block is the list of child elements placed inside the metadata
//! container of a generated document. It is cloned from the regulation's own
//! metadata document when there is one, and synthesized from the authority
//! otherwise.

use super::identity::authority_path;
use crate::analysis::Authority;
use crate::common::xml::{Element, XmlDocument};
use crate::package::constants::{default, element, namespace};

/// Clone the children of a source metadata document into the STOP data
/// namespace (as the default namespace of the target container).
///
/// The license type is dropped; a procedure type is appended when none of
/// the cloned children carries one.
pub fn clone_metadata(source: &Element) -> Vec<Element> {
    let mut block: Vec<Element> = source
        .child_elements()
        .filter(|child| !child.local_name().eq_ignore_ascii_case(element::LICENSE_TYPE))
        .map(|child| child.rebased("", namespace::STOP_DATA))
        .collect();

    let has_procedure = block
        .iter()
        .any(|child| child.local_name().eq_ignore_ascii_case(element::PROCEDURE_TYPE));
    if !has_procedure {
        block.push(procedure_type());
    }
    block
}

/// Metadata block used when the package has no metadata document.
pub fn fallback_metadata(authority: &Authority) -> Vec<Element> {
    let path = authority_path(&authority.kind, &authority.code);

    let mut topics = Element::with_namespace("onderwerpen", namespace::STOP_DATA);
    topics.push_child(data("onderwerp", default::TOPIC));

    vec![
        data("eindverantwoordelijke", &path),
        data(element::MAKER, &path),
        data("soortRegeling", default::DOCUMENT_KIND_PROGRAM),
        topics,
        procedure_type(),
    ]
}

/// Metadata block for a run: cloned when `source` is present, the
/// authority fallback otherwise.
pub fn metadata_block(source: Option<&XmlDocument>, authority: &Authority) -> Vec<Element> {
    match source {
        Some(doc) => clone_metadata(doc.root()),
        None => {
            tracing::debug!("no regulation metadata, using fallback block");
            fallback_metadata(authority)
        },
    }
}

fn procedure_type() -> Element {
    data(element::PROCEDURE_TYPE, default::PROCEDURE_TYPE)
}

fn data(name: &str, text: &str) -> Element {
    Element::text_element(name, namespace::STOP_DATA, text)
}
