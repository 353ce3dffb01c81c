//! Generated delivery documents.
//!
//! Each builder writes one complete document. Values that the source package
//! did not supply are left out rather than written empty.

use super::ScenarioContext;
use super::identity::{authority_path, decision_work, expression_at};
use crate::analysis::InformationObjectRecord;
use crate::common::xml::{Element, XmlWriter};
use crate::package::constants::{extension, generated, namespace};
use chrono::NaiveDate;

const SCHEMA_VERSION: &str = "1.2.0";

const WORK_KIND_DECISION: &str = "/join/id/stop/work_003";
const WORK_KIND_INFORMATION_OBJECT: &str = "/join/id/stop/work_010";
const WORK_KIND_CONSOLIDATED: &str = "/join/id/stop/work_019";

const FORMAT_GEOGRAPHIC: &str = "/join/id/stop/informatieobject/gio_002";
const FORMAT_DOCUMENT: &str = "/join/id/stop/informatieobject/doc_001";

const INSTRUCTION_CONSOLIDATE: &str = "TeConsolideren";
const INSTRUCTION_ANNOUNCE_ONLY: &str = "AlleenBekendTeMaken";

const TIMESTAMP_IN_FORCE: &str = "juridischWerkendVanaf";

/// What a decision does to the regulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionKind<'a> {
    /// Establish the regulation; its text goes into an annex
    Establish { text: Option<&'a Element> },
    /// Withdraw the regulation and its information objects
    Withdraw,
    /// Hand over the regulation in consolidated state
    HandOver { consolidated_expression: &'a str },
}

impl DecisionKind<'_> {
    fn work_label(&self) -> &'static str {
        match self {
            DecisionKind::Establish { .. } => "Besluit",
            DecisionKind::Withdraw => "Intrekking",
            DecisionKind::HandOver { .. } => "Doorlevering",
        }
    }

    fn long_title(&self, title: &str) -> String {
        match self {
            DecisionKind::Establish { .. } => format!("Besluit tot vaststelling van {title}"),
            DecisionKind::Withdraw => format!("Besluit tot intrekking van {title}"),
            DecisionKind::HandOver { .. } => format!("Besluit tot doorlevering van {title}"),
        }
    }
}

/// The decision (`besluit.xml`).
pub fn decision(
    ctx: &ScenarioContext<'_>,
    kind: DecisionKind<'_>,
    goal: &str,
    anchor: NaiveDate,
    metadata: &[Element],
) -> Vec<u8> {
    let anchor = anchor.to_string();
    let title = ctx.title();
    let work = decision_work(ctx.code(), ctx.year, kind.work_label(), &ctx.program);

    let mut w = XmlWriter::new();
    w.open(
        "AanleveringBesluit",
        &[("xmlns", namespace::LVBB_DELIVERY), ("schemaversie", SCHEMA_VERSION)],
    );
    w.open("BesluitVersie", &[]);

    w.open("ExpressionIdentificatie", &[("xmlns", namespace::STOP_DATA)])
        .leaf("FRBRWork", &work)
        .leaf("FRBRExpression", &expression_at(&work, &anchor))
        .leaf("soortWork", WORK_KIND_DECISION)
        .close();

    w.open("BesluitMetadata", &[("xmlns", namespace::STOP_DATA)]);
    for element in metadata {
        w.element(element);
    }
    if !matches!(kind, DecisionKind::Withdraw) {
        let refs: Vec<&str> = ctx
            .analysis
            .information_objects
            .iter()
            .filter_map(|record| record.expression_id.as_deref())
            .collect();
        if !refs.is_empty() {
            w.open("informatieobjectRefs", &[]);
            for reference in refs {
                w.leaf("informatieobjectRef", reference);
            }
            w.close();
        }
    }
    w.close();

    w.open("Procedureverloop", &[("xmlns", namespace::STOP_DATA)])
        .leaf("bekendOp", &anchor)
        .close();

    w.open("ConsolidatieInformatie", &[("xmlns", namespace::STOP_DATA)]);
    match kind {
        DecisionKind::Establish { .. } => {
            w.open("BeoogdeRegelgeving", &[]);
            intended(&mut w, "BeoogdeRegeling", goal, ctx.analysis.expression_id.as_deref(), Some("cmp_A"));
            for record in &ctx.analysis.information_objects {
                if record.expression_id.is_some() {
                    intended(
                        &mut w,
                        "BeoogdInformatieobject",
                        goal,
                        record.expression_id.as_deref(),
                        record.reference_element_id.as_deref(),
                    );
                }
            }
            w.close();
        },
        DecisionKind::Withdraw => {
            w.open("Intrekkingen", &[]);
            withdrawn(&mut w, goal, ctx.analysis.work_id.as_deref());
            for record in &ctx.analysis.information_objects {
                if record.work_id.is_some() {
                    withdrawn(&mut w, goal, record.work_id.as_deref());
                }
            }
            w.close();
        },
        DecisionKind::HandOver {
            consolidated_expression,
        } => {
            w.open("BeoogdeRegelgeving", &[]);
            intended(&mut w, "BeoogdeRegeling", goal, Some(consolidated_expression), Some("cmp_A"));
            w.close();
        },
    }
    w.open("Tijdstempels", &[])
        .open("Tijdstempel", &[])
        .leaf("doel", goal)
        .leaf("soortTijdstempel", TIMESTAMP_IN_FORCE)
        .leaf("datum", &anchor)
        .close()
        .close();
    w.close();

    w.open("BesluitCompact", &[("xmlns", namespace::STOP_TEXT)]);
    w.open("RegelingOpschrift", &[("eId", "longTitle"), ("wId", "longTitle")])
        .leaf("Al", &kind.long_title(title))
        .close();
    w.open("Lichaam", &[("eId", "body"), ("wId", "body")]);
    match kind {
        DecisionKind::Establish { .. } => {
            w.open("WijzigArtikel", &[("eId", "art_I"), ("wId", "art_I")]);
            heading(&mut w, "Artikel", "I");
            w.leaf("Wat", &format!("{title} wordt vastgesteld zoals aangegeven in Bijlage A."))
                .close();
        },
        DecisionKind::Withdraw => {
            w.open("Artikel", &[("eId", "art_I"), ("wId", "art_I")]);
            heading(&mut w, "Artikel", "I");
            w.open("Inhoud", &[])
                .leaf("Al", &format!("{title} wordt ingetrokken."))
                .close()
                .close();
        },
        DecisionKind::HandOver { .. } => {
            w.open("WijzigArtikel", &[("eId", "art_I"), ("wId", "art_I")]);
            heading(&mut w, "Artikel", "I");
            w.leaf("Wat", &format!("{title} wordt in geconsolideerde vorm doorgeleverd."))
                .close();
        },
    }
    w.open("Artikel", &[("eId", "art_II"), ("wId", "art_II")]);
    heading(&mut w, "Artikel", "II");
    w.open("Inhoud", &[])
        .leaf("Al", &format!("Dit besluit treedt in werking op {anchor}."))
        .close()
        .close();
    w.close();

    if let DecisionKind::Establish { text } = kind {
        let becomes = ctx.analysis.expression_id.as_deref().unwrap_or_default();
        w.open("WijzigBijlage", &[("eId", "cmp_A"), ("wId", "cmp_A")]);
        heading(&mut w, "Bijlage", "A");
        w.open("RegelingCompact", &[("componentnaam", "main"), ("wordt", becomes)]);
        if let Some(text) = text {
            w.element(text);
        }
        w.close().close();
    }
    w.close();
    w.close();

    if let DecisionKind::Establish { .. } = kind {
        w.open("RegelingVersieInformatie", &[]);
        w.open("ExpressionIdentificatie", &[("xmlns", namespace::STOP_DATA)])
            .leaf_opt("FRBRWork", ctx.analysis.work_id.as_deref())
            .leaf_opt("FRBRExpression", ctx.analysis.expression_id.as_deref())
            .leaf("soortWork", WORK_KIND_CONSOLIDATED)
            .close();
        w.open("RegelingVersieMetadata", &[("xmlns", namespace::STOP_DATA)])
            .leaf("versienummer", "1")
            .close();
        w.close();
    }

    w.finish()
}

/// The regulation in consolidated state (`consolidatie.xml`).
pub fn consolidation(
    ctx: &ScenarioContext<'_>,
    consolidation_id: &str,
    code: &str,
    anchor: NaiveDate,
    metadata: &[Element],
    text: Option<&Element>,
) -> Vec<u8> {
    let expression = expression_at(consolidation_id, &anchor.to_string());

    let mut w = XmlWriter::new();
    w.open(
        "AanleveringRegelingVersie",
        &[("xmlns", namespace::LVBB_DELIVERY), ("schemaversie", SCHEMA_VERSION)],
    );
    w.open("RegelingVersie", &[]);
    w.open("ExpressionIdentificatie", &[("xmlns", namespace::STOP_DATA)])
        .leaf("FRBRWork", consolidation_id)
        .leaf("FRBRExpression", &expression)
        .leaf("soortWork", WORK_KIND_CONSOLIDATED)
        .close();
    w.open("RegelingVersieMetadata", &[("xmlns", namespace::STOP_DATA)])
        .leaf("versienummer", code)
        .close();
    w.open("RegelingMetadata", &[("xmlns", namespace::STOP_DATA)]);
    for element in metadata {
        w.element(element);
    }
    w.close();
    w.open(
        "RegelingCompact",
        &[("xmlns", namespace::STOP_TEXT), ("componentnaam", "main"), ("wordt", &expression)],
    );
    w.open("RegelingOpschrift", &[("eId", "longTitle"), ("wId", "longTitle")])
        .leaf("Al", ctx.title())
        .close();
    if let Some(text) = text {
        w.element(text);
    }
    w.close();
    w.finish()
}

/// The submission order (`opdracht.xml`).
pub fn submission_order(ctx: &ScenarioContext<'_>, anchor: NaiveDate) -> Vec<u8> {
    let root = format!("lvbb:{}", ctx.scenario.submission_root());

    let mut w = XmlWriter::new();
    w.open(&root, &[("xmlns:lvbb", namespace::LVBB)])
        .leaf("lvbb:idLevering", &ctx.delivery_id())
        .leaf("lvbb:idBevoegdGezag", ctx.code())
        .leaf("lvbb:idAanleveraar", ctx.code())
        .leaf("lvbb:publicatie", generated::DECISION);
    if ctx.consolidates() {
        w.leaf("lvbb:consolidatie", generated::CONSOLIDATION);
    }
    w.leaf("lvbb:datumBekendmaking", &anchor.to_string());
    w.finish()
}

/// Delivery document of one information object (`{folder}.xml`).
pub fn information_object(ctx: &ScenarioContext<'_>, record: &InformationObjectRecord) -> Vec<u8> {
    let authority = authority_path(&ctx.authority.kind, &ctx.authority.code);
    let geographic = record
        .payload_file
        .as_deref()
        .is_some_and(|name| name.to_ascii_lowercase().ends_with(&format!(".{}", extension::GEOGRAPHIC)));

    let mut w = XmlWriter::new();
    w.open(
        "AanleveringInformatieObject",
        &[("xmlns", namespace::LVBB_DELIVERY), ("schemaversie", SCHEMA_VERSION)],
    );
    w.open("InformatieObjectVersie", &[]);

    w.open("ExpressionIdentificatie", &[("xmlns", namespace::STOP_DATA)])
        .leaf_opt("FRBRWork", record.work_id.as_deref())
        .leaf_opt("FRBRExpression", record.expression_id.as_deref())
        .leaf("soortWork", WORK_KIND_INFORMATION_OBJECT)
        .close();

    w.open("InformatieObjectVersieMetadata", &[("xmlns", namespace::STOP_DATA)])
        .leaf_opt("heeftGeboorteregeling", ctx.analysis.work_id.as_deref());
    if let Some(payload) = record.payload_file.as_deref() {
        w.open("heeftBestanden", &[])
            .open("heeftBestand", &[])
            .open("Bestand", &[])
            .leaf("bestandsnaam", payload)
            .leaf_opt("hash", record.digest.as_deref())
            .close()
            .close()
            .close();
    }
    w.close();

    w.open("InformatieObjectMetadata", &[("xmlns", namespace::STOP_DATA)])
        .leaf("eindverantwoordelijke", &authority)
        .leaf("maker", &authority)
        .leaf("officieleTitel", record.display_title())
        .leaf(
            "formaatInformatieobject",
            if geographic { FORMAT_GEOGRAPHIC } else { FORMAT_DOCUMENT },
        )
        .leaf(
            "publicatieinstructie",
            if geographic {
                INSTRUCTION_CONSOLIDATE
            } else {
                INSTRUCTION_ANNOUNCE_ONLY
            },
        )
        .leaf_opt("verwijzing", record.reference_element_id.as_deref())
        .close();

    w.finish()
}

/// Output name of the delivery document of an information object.
pub fn information_object_name(record: &InformationObjectRecord) -> String {
    format!("{}.{}", record.folder, extension::XML)
}

fn intended(w: &mut XmlWriter, name: &str, goal: &str, version: Option<&str>, element_id: Option<&str>) {
    w.open(name, &[])
        .open("doelen", &[])
        .leaf("doel", goal)
        .close()
        .leaf_opt("instrumentVersie", version)
        .leaf_opt("eId", element_id)
        .close();
}

fn withdrawn(w: &mut XmlWriter, goal: &str, instrument: Option<&str>) {
    w.open("Intrekking", &[])
        .open("doelen", &[])
        .leaf("doel", goal)
        .close()
        .leaf_opt("instrument", instrument)
        .leaf("eId", "art_I")
        .close();
}

fn heading(w: &mut XmlWriter, label: &str, number: &str) {
    w.open("Kop", &[]).leaf("Label", label).leaf("Nummer", number).close();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{ArchiveAnalysis, Authority};
    use crate::common::FixedClock;
    use crate::common::xml::XmlDocument;
    use crate::config::TransformOptions;
    use crate::package::source::SourcePackage;
    use crate::scenario::Scenario;

    fn analysis() -> ArchiveAnalysis {
        ArchiveAnalysis {
            work_id: Some("/akn/nl/act/gm0001/2025/PrgClimate".to_string()),
            expression_id: Some("/akn/nl/act/gm0001/2025/PrgClimate/nld@2025-01-15".to_string()),
            authority: Some(Authority {
                kind: "gemeente".to_string(),
                code: "gm0001".to_string(),
            }),
            title: Some("Klimaat & Energie".to_string()),
            information_objects: vec![InformationObjectRecord {
                work_id: Some("/join/id/regdata/gm0001/2025/kaart".to_string()),
                expression_id: Some("/join/id/regdata/gm0001/2025/kaart/nld@2025-01-15".to_string()),
                reference_element_id: Some("art_1__ref_o_1".to_string()),
                payload_file: Some("kaart.gml".to_string()),
                digest: Some("ab".repeat(64)),
                ..InformationObjectRecord::new("IO-1")
            }],
            ..ArchiveAnalysis::default()
        }
    }

    fn anchor() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 3).unwrap()
    }

    fn parse(bytes: &[u8]) -> XmlDocument {
        XmlDocument::parse(bytes).unwrap()
    }

    #[test]
    fn test_publication_decision_is_well_formed() {
        let pkg = SourcePackage::default();
        let analysis = analysis();
        let clock = FixedClock::at_date(NaiveDate::from_ymd_opt(2025, 6, 2).unwrap());
        let ctx = ScenarioContext::new(Scenario::Publication, &pkg, &analysis, &TransformOptions::default(), &clock)
            .unwrap();
        let text = Element::text_element("Lichaam", namespace::STOP_TEXT, "tekst");
        let bytes = decision(&ctx, DecisionKind::Establish { text: Some(&text) }, "GOAL", anchor(), &[]);
        let doc = parse(&bytes);
        let root = doc.root();

        assert!(root.is(namespace::LVBB_DELIVERY, "AanleveringBesluit"));
        assert_eq!(
            root.find(namespace::STOP_DATA, "FRBRWork").unwrap().text(),
            "/akn/nl/bill/gm0001/2025/BesluitClimate"
        );
        assert_eq!(
            root.find(namespace::STOP_DATA, "BeoogdInformatieobject")
                .and_then(|e| e.find(namespace::STOP_DATA, "eId"))
                .unwrap()
                .text(),
            "art_1__ref_o_1"
        );
        assert_eq!(
            root.find(namespace::STOP_TEXT, "Al").unwrap().text(),
            "Besluit tot vaststelling van Klimaat & Energie"
        );
        assert!(root.find_local("RegelingVersieInformatie").is_some());
        assert_eq!(root.find(namespace::STOP_TEXT, "RegelingCompact").unwrap().text().trim(), "tekst");
    }

    #[test]
    fn test_withdrawal_decision_lists_withdrawn_instruments() {
        let pkg = SourcePackage::default();
        let analysis = analysis();
        let clock = FixedClock::at_date(NaiveDate::from_ymd_opt(2025, 6, 2).unwrap());
        let ctx = ScenarioContext::new(Scenario::Withdrawal, &pkg, &analysis, &TransformOptions::default(), &clock)
            .unwrap();
        let doc = parse(&decision(&ctx, DecisionKind::Withdraw, "GOAL", anchor(), &[]));
        let instruments: Vec<String> = doc
            .root()
            .descendants()
            .filter(|e| e.local_name() == "instrument")
            .map(|e| e.text())
            .collect();
        assert_eq!(
            instruments,
            vec![
                "/akn/nl/act/gm0001/2025/PrgClimate".to_string(),
                "/join/id/regdata/gm0001/2025/kaart".to_string()
            ]
        );
        assert!(doc.root().find_local("informatieobjectRefs").is_none());
        assert!(doc.root().find_local("WijzigBijlage").is_none());
    }

    #[test]
    fn test_submission_order_root_per_scenario() {
        let pkg = SourcePackage::default();
        let analysis = analysis();
        let clock = FixedClock::at_date(NaiveDate::from_ymd_opt(2025, 6, 2).unwrap());
        let options = TransformOptions::default();

        let ctx = ScenarioContext::new(Scenario::Validation, &pkg, &analysis, &options, &clock).unwrap();
        let doc = parse(&submission_order(&ctx, anchor()));
        assert!(doc.root().is(namespace::LVBB, "validatieOpdracht"));
        assert_eq!(
            doc.root().find(namespace::LVBB, "idLevering").unwrap().text(),
            "validatie-gm0001-Climate-20250602120000"
        );
        assert!(doc.root().find(namespace::LVBB, "consolidatie").is_none());

        let ctx = ScenarioContext::new(Scenario::HandOver, &pkg, &analysis, &options, &clock).unwrap();
        let doc = parse(&submission_order(&ctx, anchor()));
        assert!(doc.root().is(namespace::LVBB, "doorleverOpdracht"));
        assert_eq!(
            doc.root().find(namespace::LVBB, "consolidatie").unwrap().text(),
            "consolidatie.xml"
        );
    }

    #[test]
    fn test_information_object_document() {
        let pkg = SourcePackage::default();
        let analysis = analysis();
        let clock = FixedClock::at_date(NaiveDate::from_ymd_opt(2025, 6, 2).unwrap());
        let ctx = ScenarioContext::new(Scenario::Publication, &pkg, &analysis, &TransformOptions::default(), &clock)
            .unwrap();
        let record = &analysis.information_objects[0];
        let doc = parse(&information_object(&ctx, record));
        let root = doc.root();

        assert_eq!(information_object_name(record), "IO-1.xml");
        assert_eq!(root.find(namespace::STOP_DATA, "bestandsnaam").unwrap().text(), "kaart.gml");
        assert_eq!(root.find(namespace::STOP_DATA, "hash").unwrap().text(), "ab".repeat(64));
        assert_eq!(
            root.find(namespace::STOP_DATA, "formaatInformatieobject").unwrap().text(),
            FORMAT_GEOGRAPHIC
        );
        assert_eq!(root.find(namespace::STOP_DATA, "officieleTitel").unwrap().text(), "IO-1");
    }
}
