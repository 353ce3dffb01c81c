//! Hand-over of the consolidated program.
//!
//! Next to the decision, the regulation is regenerated in consolidated state
//! under a pseudo-identifier derived from its work identifier. Both documents
//! refer to the same consolidated identifier.

use super::documents::{self, DecisionKind};
use super::identity::expression_at;
use super::{GeneratedDocument, ScenarioContext, ScenarioResult, dates, identity};
use crate::common::Result;
use crate::package::constants::generated;
use crate::package::entries::EntryOrigin;

pub fn process(ctx: &ScenarioContext<'_>) -> Result<ScenarioResult> {
    let goal = identity::hand_over_goal(ctx.code(), &ctx.program, ctx.year);
    let anchor = dates::next_monday(ctx.today)?;
    let metadata = ctx.metadata_block();
    let text = ctx.free_text();

    let code = identity::pseudo_code(ctx.analysis.work_id.as_deref().unwrap_or_default());
    let consolidated = identity::consolidation_id(ctx.code(), ctx.year, &code);
    let consolidated_expression = expression_at(&consolidated, &anchor.to_string());

    let mut docs = vec![
        GeneratedDocument::new(
            generated::DECISION,
            documents::decision(
                ctx,
                DecisionKind::HandOver {
                    consolidated_expression: &consolidated_expression,
                },
                &goal,
                anchor,
                &metadata,
            ),
            EntryOrigin::Generated,
        ),
        GeneratedDocument::new(
            generated::CONSOLIDATION,
            documents::consolidation(ctx, &consolidated, &code, anchor, &metadata, text.as_ref()),
            EntryOrigin::Generated,
        ),
        GeneratedDocument::new(
            generated::SUBMISSION_ORDER,
            documents::submission_order(ctx, anchor),
            EntryOrigin::Generated,
        ),
    ];
    for record in &ctx.analysis.information_objects {
        docs.push(GeneratedDocument::new(
            documents::information_object_name(record),
            documents::information_object(ctx, record),
            EntryOrigin::InformationObjectDocument,
        ));
    }

    Ok(ScenarioResult {
        scenario: ctx.scenario,
        documents: docs,
        modified: Vec::new(),
        goal_id: goal,
        consolidation_id: Some(consolidated),
        anchor_date: anchor,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze;
    use crate::common::FixedClock;
    use crate::common::xml::XmlDocument;
    use crate::config::TransformOptions;
    use crate::package::constants::namespace;
    use crate::package::source::SourcePackage;
    use crate::scenario::Scenario;
    use chrono::NaiveDate;

    fn package(work: &str) -> SourcePackage {
        SourcePackage::from_entries([
            (
                "Regeling/Identificatie.xml".to_string(),
                format!("<ExpressionIdentificatie><FRBRWork>{work}</FRBRWork></ExpressionIdentificatie>").into_bytes(),
            ),
            (
                "Regeling/Metadata.xml".to_string(),
                b"<RegelingMetadata><maker>/tooi/id/waterschap/ws0155</maker></RegelingMetadata>".to_vec(),
            ),
        ])
    }

    #[test]
    fn test_consolidated_id_shared_by_both_documents() {
        let pkg = package("/akn/nl/act/ws0155/2024/PrgDijken");
        let analysis = analyze(&pkg);
        let clock = FixedClock::at_date(NaiveDate::from_ymd_opt(2025, 6, 4).unwrap());
        let ctx = ScenarioContext::new(Scenario::HandOver, &pkg, &analysis, &TransformOptions::default(), &clock)
            .unwrap();
        let result = process(&ctx).unwrap();

        let code = identity::pseudo_code("/akn/nl/act/ws0155/2024/PrgDijken");
        let expected = format!("/akn/nl/act/ws0155/2025/CONS{code}");
        assert_eq!(result.consolidation_id.as_deref(), Some(expected.as_str()));
        assert_eq!(result.anchor_date, NaiveDate::from_ymd_opt(2025, 6, 9).unwrap());

        let names: Vec<_> = result.documents.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["besluit.xml", "consolidatie.xml", "opdracht.xml"]);

        let consolidation = XmlDocument::parse(&result.documents[1].content).unwrap();
        assert_eq!(
            consolidation.root().find(namespace::STOP_DATA, "FRBRWork").unwrap().text(),
            expected
        );
        let decision = XmlDocument::parse(&result.documents[0].content).unwrap();
        assert_eq!(
            decision.root().find(namespace::STOP_DATA, "instrumentVersie").unwrap().text(),
            format!("{expected}/nld@2025-06-09")
        );
    }

    #[test]
    fn test_empty_work_uses_zero_code() {
        let pkg = SourcePackage::from_entries([(
            "Regeling/Metadata.xml",
            b"<RegelingMetadata><maker>/tooi/id/gemeente/gm0001</maker></RegelingMetadata>".to_vec(),
        )]);
        let analysis = analyze(&pkg);
        let clock = FixedClock::at_date(NaiveDate::from_ymd_opt(2025, 6, 2).unwrap());
        let ctx = ScenarioContext::new(Scenario::HandOver, &pkg, &analysis, &TransformOptions::default(), &clock)
            .unwrap();
        let result = process(&ctx).unwrap();
        assert_eq!(result.consolidation_id.as_deref(), Some("/akn/nl/act/gm0001/2025/CONS000000"));
    }
}
