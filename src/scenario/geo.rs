//! Termination status of geo-object files.
//!
//! A withdrawal terminates every domain object: each element directly inside
//! an `owObject` container gets a status element with the termination value
//! as its first child. Objects that carry the termination status anywhere
//! are left as they are. Legal-text objects take the status element from the
//! IMOW rules namespace, all other objects from the IMOW object namespace.
//!
//! The pass is idempotent: a file whose objects are all terminated already is
//! left alone, and only files that actually changed are returned.

use super::ModifiedFile;
use crate::common::xml::{Element, Node, XmlDocument};
use crate::package::constants::{element, extension, namespace};
use crate::package::source::SourcePackage;

/// Namespace bindings in scope, innermost last.
#[derive(Debug, Clone, Default)]
struct StatusScope {
    bindings: Vec<(String, String)>,
}

impl StatusScope {
    fn enter(&self, scope_owner: &Element) -> Self {
        let mut bindings = self.bindings.clone();
        for (key, uri) in scope_owner.attributes() {
            let prefix = match key.as_str() {
                "xmlns" => "",
                other => match other.strip_prefix("xmlns:") {
                    Some(prefix) => prefix,
                    None => continue,
                },
            };
            bindings.retain(|(bound, _)| bound != prefix);
            bindings.push((prefix.to_string(), uri.clone()));
        }
        Self { bindings }
    }

    /// A prefix currently bound to `ns`, if any.
    fn prefix(&self, ns: &str) -> Option<&str> {
        self.bindings
            .iter()
            .rev()
            .find(|(_, uri)| uri == ns)
            .map(|(prefix, _)| prefix.as_str())
    }
}

/// Rewrite every geo-object file of `source` whose objects are not all
/// terminated yet.
pub fn terminate_geo_objects(source: &SourcePackage) -> Vec<ModifiedFile> {
    let mut modified = Vec::new();

    for entry in source.files() {
        let path = entry.path();
        if !path.is_geo_object() || path.is_geo_object_manifest() || path.ext() != extension::XML {
            continue;
        }

        let mut doc = match XmlDocument::parse(entry.data()) {
            Ok(doc) => doc,
            Err(err) => {
                tracing::debug!(entry = entry.name(), error = %err, "geo-object file left as is");
                continue;
            },
        };

        let changed = terminate_document(&mut doc);
        if changed > 0 {
            tracing::debug!(entry = entry.name(), objects = changed, "terminated geo objects");
            modified.push(ModifiedFile {
                source_name: entry.name().to_string(),
                content: doc.to_bytes(),
            });
        }
    }

    modified
}

/// Terminate every domain object of a document; returns the number of
/// objects that changed.
pub fn terminate_document(doc: &mut XmlDocument) -> usize {
    terminate_in(doc.root_mut(), &StatusScope::default())
}

fn terminate_in(parent: &mut Element, scope: &StatusScope) -> usize {
    let scope = scope.enter(parent);

    if parent.local_name() == element::OW_OBJECT {
        return parent
            .child_elements_mut()
            .map(|object| {
                let scope = scope.enter(object);
                usize::from(terminate_object(object, &scope))
            })
            .sum();
    }

    parent
        .child_elements_mut()
        .map(|child| terminate_in(child, &scope))
        .sum()
}

fn is_status(node: &Node) -> bool {
    matches!(node, Node::Element(e) if e.local_name() == element::STATUS)
}

fn terminate_object(object: &mut Element, scope: &StatusScope) -> bool {
    let ns = if element::LEGAL_TEXT_OBJECTS.contains(&object.local_name()) {
        namespace::IMOW_RULES
    } else {
        namespace::IMOW_OBJECT
    };

    let children = object.children_mut();
    let already_terminated = children.iter().any(|node| {
        is_status(node)
            && matches!(node, Node::Element(e) if e.text().trim() == element::STATUS_TERMINATED)
    });
    if already_terminated {
        return false;
    }

    let status_at = children.iter().position(is_status);

    let status = match status_at.map(|pos| children.remove(pos)) {
        Some(Node::Element(mut existing)) => {
            existing.set_text(element::STATUS_TERMINATED);
            existing
        },
        _ => new_status(ns, scope.prefix(ns)),
    };
    children.insert(0, Node::Element(status));
    true
}

fn new_status(ns: &str, prefix: Option<&str>) -> Element {
    let mut status = match prefix {
        Some("") | None => Element::with_namespace(element::STATUS, ns),
        Some(prefix) => Element::with_namespace(&format!("{prefix}:{}", element::STATUS), ns),
    };
    if prefix.is_none() {
        status.set_attribute("xmlns", ns);
    }
    status.set_text(element::STATUS_TERMINATED);
    status
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOCATIONS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ow-dc:owBestand xmlns:ow-dc="http://www.geostandaarden.nl/imow/bestanden/deelbestand" xmlns:l="http://www.geostandaarden.nl/imow/locatie" xmlns:ow="http://www.geostandaarden.nl/imow/owobject" xmlns:r="http://www.geostandaarden.nl/imow/regels">
  <ow-dc:standBestand>
    <ow-dc:owObject>
      <l:Gebied>
        <l:identificatie>nl.imow-gm0001.gebied.1</l:identificatie>
      </l:Gebied>
    </ow-dc:owObject>
    <ow-dc:owObject>
      <r:Regeltekst>
        <r:identificatie>nl.imow-gm0001.regeltekst.1</r:identificatie>
        <r:status>ontwerp</r:status>
      </r:Regeltekst>
    </ow-dc:owObject>
  </ow-dc:standBestand>
</ow-dc:owBestand>"#;

    fn first_child(root: &Element, object: &str) -> Element {
        root.find_local(object)
            .and_then(|e| e.child_elements().next())
            .cloned()
            .unwrap()
    }

    #[test]
    fn test_status_inserted_first_in_matching_namespace() {
        let mut doc = XmlDocument::parse(LOCATIONS.as_bytes()).unwrap();
        assert_eq!(terminate_document(&mut doc), 2);

        let reparsed = XmlDocument::parse(&doc.to_bytes()).unwrap();
        let gebied = first_child(reparsed.root(), "Gebied");
        assert_eq!(gebied.name(), "ow:status");
        assert!(gebied.is(namespace::IMOW_OBJECT, "status"));
        assert_eq!(gebied.text(), "beëindigen");

        let regeltekst = first_child(reparsed.root(), "Regeltekst");
        assert!(regeltekst.is(namespace::IMOW_RULES, "status"));
        assert_eq!(regeltekst.text(), "beëindigen");
        let statuses = reparsed
            .root()
            .find_local("Regeltekst")
            .unwrap()
            .child_elements()
            .filter(|e| e.local_name() == "status")
            .count();
        assert_eq!(statuses, 1);
    }

    #[test]
    fn test_termination_is_idempotent() {
        let mut doc = XmlDocument::parse(LOCATIONS.as_bytes()).unwrap();
        terminate_document(&mut doc);
        let once = doc.to_bytes();

        let mut again = XmlDocument::parse(&once).unwrap();
        assert_eq!(terminate_document(&mut again), 0);
        assert_eq!(again.to_bytes(), once);
    }

    #[test]
    fn test_undeclared_namespace_is_declared_on_status() {
        let mut doc = XmlDocument::parse(
            b"<owBestand><owObject><Activiteit><naam>x</naam></Activiteit></owObject></owBestand>",
        )
        .unwrap();
        assert_eq!(terminate_document(&mut doc), 1);
        let xml = String::from_utf8(doc.to_bytes()).unwrap();
        assert!(xml.contains(r#"<Activiteit><status xmlns="http://www.geostandaarden.nl/imow/owobject">beëindigen</status><naam>"#));
    }

    #[test]
    fn test_only_changed_geo_files_are_returned() {
        let terminated = r#"<owBestand xmlns:ow="http://www.geostandaarden.nl/imow/owobject"><owObject><Pons><ow:status>beëindigen</ow:status></Pons></owObject></owBestand>"#;
        let source = SourcePackage::from_entries([
            ("OW-bestanden/locaties.xml", LOCATIONS.as_bytes().to_vec()),
            ("OW-bestanden/pons.xml", terminated.as_bytes().to_vec()),
            ("OW-bestanden/manifest-ow.xml", LOCATIONS.as_bytes().to_vec()),
            ("OW-bestanden/kapot.xml", b"<owBestand>".to_vec()),
            ("Regeling/Tekst.xml", LOCATIONS.as_bytes().to_vec()),
        ]);
        let modified = terminate_geo_objects(&source);
        let names: Vec<_> = modified.iter().map(|m| m.source_name.as_str()).collect();
        assert_eq!(names, vec!["OW-bestanden/locaties.xml"]);
    }

    #[test]
    fn test_rebound_default_namespace_is_not_reused() {
        let mut doc = XmlDocument::parse(
            br#"<owBestand xmlns="http://www.geostandaarden.nl/imow/owobject"><owObject><Gebied xmlns="http://www.geostandaarden.nl/imow/locatie"><naam>x</naam></Gebied></owObject></owBestand>"#,
        )
        .unwrap();
        assert_eq!(terminate_document(&mut doc), 1);

        let reparsed = XmlDocument::parse(&doc.to_bytes()).unwrap();
        let status = first_child(reparsed.root(), "Gebied");
        assert_eq!(status.local_name(), "status");
        assert_eq!(status.namespace(), Some(namespace::IMOW_OBJECT));
    }

    #[test]
    fn test_rebound_prefix_is_not_reused() {
        let mut doc = XmlDocument::parse(
            br#"<b xmlns:r="http://www.geostandaarden.nl/imow/regels"><owObject xmlns:r="urn:elders"><r:Regeltekst><r:id>1</r:id></r:Regeltekst></owObject></b>"#,
        )
        .unwrap();
        assert_eq!(terminate_document(&mut doc), 1);

        let reparsed = XmlDocument::parse(&doc.to_bytes()).unwrap();
        let status = first_child(reparsed.root(), "Regeltekst");
        assert_eq!(status.namespace(), Some(namespace::IMOW_RULES));
    }

    #[test]
    fn test_terminated_status_anywhere_is_left_alone() {
        let xml = r#"<b xmlns:ow="http://www.geostandaarden.nl/imow/owobject"><owObject><Gebied><naam>x</naam><ow:status>beëindigen</ow:status></Gebied></owObject></b>"#;
        let mut doc = XmlDocument::parse(xml.as_bytes()).unwrap();
        let before = doc.clone();
        assert_eq!(terminate_document(&mut doc), 0);
        assert_eq!(doc, before);

        let source = SourcePackage::from_entries([("OW-bestanden/gebieden.xml", xml.as_bytes().to_vec())]);
        assert!(terminate_geo_objects(&source).is_empty());
    }

    #[test]
    fn test_files_without_objects_are_untouched() {
        let mut doc = XmlDocument::parse(b"<owBestand><standBestand/></owBestand>").unwrap();
        assert_eq!(terminate_document(&mut doc), 0);
    }
}
