//! Withdrawal of a published program.

use super::documents::{self, DecisionKind};
use super::{GeneratedDocument, ScenarioContext, ScenarioResult, dates, geo, identity};
use crate::common::Result;
use crate::package::constants::generated;
use crate::package::entries::EntryOrigin;

pub fn process(ctx: &ScenarioContext<'_>) -> Result<ScenarioResult> {
    let goal = identity::withdrawal_goal(ctx.code(), &ctx.program, ctx.year);
    let anchor = dates::next_business_day(ctx.today)?;
    let metadata = ctx.metadata_block();

    let mut docs = vec![
        GeneratedDocument::new(
            generated::DECISION,
            documents::decision(ctx, DecisionKind::Withdraw, &goal, anchor, &metadata),
            EntryOrigin::Generated,
        ),
        GeneratedDocument::new(
            generated::SUBMISSION_ORDER,
            documents::submission_order(ctx, anchor),
            EntryOrigin::Generated,
        ),
    ];
    // Written into the package, left out of the manifest.
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
        modified: geo::terminate_geo_objects(ctx.source),
        goal_id: goal,
        consolidation_id: None,
        anchor_date: anchor,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze;
    use crate::common::FixedClock;
    use crate::config::TransformOptions;
    use crate::package::source::SourcePackage;
    use crate::scenario::Scenario;
    use chrono::NaiveDate;

    #[test]
    fn test_geo_objects_are_terminated() {
        let pkg = SourcePackage::from_entries([
            (
                "Regeling/Metadata.xml",
                b"<RegelingMetadata><maker>/tooi/id/gemeente/gm0001</maker></RegelingMetadata>".to_vec(),
            ),
            ("OW-bestanden/locaties.xml", b"<owBestand><owObject><Gebied/></owObject></owBestand>".to_vec()),
        ]);
        let analysis = analyze(&pkg);
        let clock = FixedClock::at_date(NaiveDate::from_ymd_opt(2025, 6, 2).unwrap());
        let ctx = ScenarioContext::new(Scenario::Withdrawal, &pkg, &analysis, &TransformOptions::default(), &clock)
            .unwrap();

        let result = process(&ctx).unwrap();
        assert_eq!(result.modified.len(), 1);
        assert_eq!(result.modified[0].source_name, "OW-bestanden/locaties.xml");
        let content = String::from_utf8(result.modified[0].content.clone()).unwrap();
        assert!(content.contains("beëindigen"));
        assert_eq!(result.goal_id, "/join/id/proces/gm0001/2025/IntrekkingProgramma2025");
    }
}
