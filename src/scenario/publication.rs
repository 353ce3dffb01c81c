//! Publication and validation.
//!
//! Both produce the same documents; a validation only differs in the root
//! element of its submission order.

use super::documents::{self, DecisionKind};
use super::{GeneratedDocument, ScenarioContext, ScenarioResult, dates, identity};
use crate::common::Result;
use crate::package::constants::generated;
use crate::package::entries::EntryOrigin;

pub fn process(ctx: &ScenarioContext<'_>) -> Result<ScenarioResult> {
    let goal = identity::publication_goal(ctx.code(), &ctx.program, ctx.year);
    let anchor = dates::next_business_day(ctx.today)?;
    let metadata = ctx.metadata_block();
    let text = ctx.free_text();

    let mut docs = vec![
        GeneratedDocument::new(
            generated::DECISION,
            documents::decision(
                ctx,
                DecisionKind::Establish { text: text.as_ref() },
                &goal,
                anchor,
                &metadata,
            ),
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
        consolidation_id: None,
        anchor_date: anchor,
    })
}
