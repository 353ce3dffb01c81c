//! Scenario processors.
//!
//! A processor turns an analyzed source package into the documents of one
//! legal scenario: a decision, a submission order, one delivery document per
//! information object and, for a hand-over, the regulation in consolidated
//! state. Withdrawal additionally rewrites the geo-object files so every
//! domain object carries a termination status.
//!
//! Processors are pure functions of the source package, its analysis, the
//! options and the clock. They only fail when the analysis has no authority.

mod dates;
mod documents;
mod geo;
mod handover;
mod identity;
mod metadata;
mod publication;
mod withdrawal;

pub use dates::{next_business_day, next_monday};
pub use geo::{terminate_document, terminate_geo_objects};
pub use identity::{
    consolidation_id, hand_over_goal, program_token, pseudo_code, publication_goal,
    withdrawal_goal,
};
pub use metadata::{clone_metadata, fallback_metadata, metadata_block};

use crate::analysis::{self, ArchiveAnalysis, Authority};
use crate::common::xml::{Element, XmlDocument};
use crate::common::{Clock, Error, Result};
use crate::config::TransformOptions;
use crate::package::constants::{geo_rename, path};
use crate::package::entries::EntryOrigin;
use crate::package::source::SourcePackage;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use std::fmt;

/// The legal scenario a package is produced for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scenario {
    /// Publication of the program
    Publication,
    /// Dry run of a publication, checked but not published
    Validation,
    /// Withdrawal of a published program
    Withdrawal,
    /// Hand-over of the consolidated program to another authority
    HandOver,
}

impl Scenario {
    pub const ALL: [Scenario; 4] = [
        Scenario::Publication,
        Scenario::Validation,
        Scenario::Withdrawal,
        Scenario::HandOver,
    ];

    /// Dutch label, used in output file names and delivery identifiers.
    pub fn label(self) -> &'static str {
        match self {
            Scenario::Publication => "publicatie",
            Scenario::Validation => "validatie",
            Scenario::Withdrawal => "intrekking",
            Scenario::HandOver => "doorlevering",
        }
    }

    pub fn is_withdrawal(self) -> bool {
        self == Scenario::Withdrawal
    }

    /// Root element of the submission order.
    pub fn submission_root(self) -> &'static str {
        match self {
            Scenario::Publication | Scenario::Withdrawal => "publicatieOpdracht",
            Scenario::Validation => "validatieOpdracht",
            Scenario::HandOver => "doorleverOpdracht",
        }
    }

    /// Output names of canonical geo-object files.
    pub fn geo_renames(self) -> &'static phf::Map<&'static str, &'static str> {
        match self {
            Scenario::Publication | Scenario::Validation => &geo_rename::PUBLICATION,
            Scenario::Withdrawal => &geo_rename::WITHDRAWAL,
            Scenario::HandOver => &geo_rename::HAND_OVER,
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A document produced by a processor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedDocument {
    pub name: String,
    pub content: Vec<u8>,
    pub origin: EntryOrigin,
}

impl GeneratedDocument {
    pub fn new(name: impl Into<String>, content: Vec<u8>, origin: EntryOrigin) -> Self {
        Self {
            name: name.into(),
            content,
            origin,
        }
    }
}

/// Replacement content for a file that exists in the source package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifiedFile {
    /// Entry name in the source package
    pub source_name: String,
    pub content: Vec<u8>,
}

/// Everything a processor produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioResult {
    pub scenario: Scenario,
    /// Generated documents, in output order
    pub documents: Vec<GeneratedDocument>,
    /// Rewritten source files
    pub modified: Vec<ModifiedFile>,
    /// Goal identifier shared by all generated documents
    pub goal_id: String,
    /// Consolidated-state identifier (hand-over only)
    pub consolidation_id: Option<String>,
    /// Date the generated documents are anchored at
    pub anchor_date: NaiveDate,
}

/// Inputs shared by every processor.
#[derive(Debug)]
pub struct ScenarioContext<'a> {
    pub scenario: Scenario,
    pub source: &'a SourcePackage,
    pub analysis: &'a ArchiveAnalysis,
    pub authority: &'a Authority,
    pub program: String,
    pub today: NaiveDate,
    pub now: DateTime<Utc>,
    pub year: i32,
}

impl<'a> ScenarioContext<'a> {
    /// Build the context, failing when the analysis has no authority.
    pub fn new<C: Clock>(
        scenario: Scenario,
        source: &'a SourcePackage,
        analysis: &'a ArchiveAnalysis,
        options: &TransformOptions,
        clock: &C,
    ) -> Result<Self> {
        let authority = analysis.authority.as_ref().ok_or(Error::MissingAuthority)?;
        let today = clock.today();
        Ok(Self {
            scenario,
            source,
            analysis,
            authority,
            program: program_token(analysis.work_id.as_deref(), &options.default_program),
            today,
            now: clock.now(),
            year: today.year(),
        })
    }

    pub fn code(&self) -> &str {
        &self.authority.code
    }

    /// Official title, falling back to the program token.
    pub fn title(&self) -> &str {
        self.analysis.title.as_deref().unwrap_or(&self.program)
    }

    /// Metadata block of the generated documents.
    pub fn metadata_block(&self) -> Vec<Element> {
        let source = analysis::load(self.source, path::METADATA);
        metadata_block(source.as_ref(), self.authority)
    }

    /// Root element of the regulation text, if the package has one.
    pub fn free_text(&self) -> Option<Element> {
        analysis::load(self.source, path::FREE_TEXT).map(XmlDocument::into_root)
    }

    /// Whether the run also delivers the regulation in consolidated state.
    pub fn consolidates(&self) -> bool {
        self.scenario == Scenario::HandOver
    }

    /// Delivery identifier of the submission order.
    pub fn delivery_id(&self) -> String {
        format!(
            "{}-{}-{}-{}",
            self.scenario.label(),
            self.code(),
            self.program,
            self.now.format("%Y%m%d%H%M%S")
        )
    }
}

/// Run the processor of `scenario`.
///
/// # Errors
/// Returns [`Error::MissingAuthority`] before producing anything when the
/// analysis has no authority code.
pub fn process<C: Clock>(
    scenario: Scenario,
    source: &SourcePackage,
    analysis: &ArchiveAnalysis,
    options: &TransformOptions,
    clock: &C,
) -> Result<ScenarioResult> {
    let ctx = ScenarioContext::new(scenario, source, analysis, options, clock)?;
    let result = match scenario {
        Scenario::Publication | Scenario::Validation => publication::process(&ctx)?,
        Scenario::Withdrawal => withdrawal::process(&ctx)?,
        Scenario::HandOver => handover::process(&ctx)?,
    };
    tracing::info!(
        scenario = %scenario,
        goal = %result.goal_id,
        documents = result.documents.len(),
        modified = result.modified.len(),
        "scenario processed"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze;
    use crate::common::FixedClock;

    fn clock() -> FixedClock {
        // Monday
        FixedClock::at_date(NaiveDate::from_ymd_opt(2025, 6, 2).unwrap())
    }

    fn package() -> SourcePackage {
        SourcePackage::from_entries([
            (
                path::IDENTIFICATION,
                br#"<ExpressionIdentificatie xmlns="https://standaarden.overheid.nl/stop/imop/data/"><FRBRWork>/akn/nl/act/gm0001/2025/PrgClimate</FRBRWork><FRBRExpression>/akn/nl/act/gm0001/2025/PrgClimate/nld@2025-01-15</FRBRExpression></ExpressionIdentificatie>"#.to_vec(),
            ),
            (
                path::METADATA,
                br#"<RegelingMetadata xmlns="https://standaarden.overheid.nl/stop/imop/data/"><maker>/tooi/id/gemeente/gm0001</maker><officieleTitel>Klimaatprogramma</officieleTitel></RegelingMetadata>"#.to_vec(),
            ),
        ])
    }

    #[test]
    fn test_missing_authority_fails_fast() {
        let pkg = SourcePackage::default();
        let analysis = analyze(&pkg);
        for scenario in Scenario::ALL {
            let err = process(scenario, &pkg, &analysis, &TransformOptions::default(), &clock())
                .unwrap_err();
            assert!(matches!(err, Error::MissingAuthority));
        }
    }

    #[test]
    fn test_goal_per_scenario() {
        let pkg = package();
        let analysis = analyze(&pkg);
        let options = TransformOptions::default();
        let goal = |scenario| {
            process(scenario, &pkg, &analysis, &options, &clock())
                .unwrap()
                .goal_id
        };
        assert_eq!(
            goal(Scenario::Publication),
            "/join/id/proces/gm0001/2025/ProgClimatePPD20252029"
        );
        assert_eq!(goal(Scenario::Validation), goal(Scenario::Publication));
        assert_eq!(
            goal(Scenario::Withdrawal),
            "/join/id/proces/gm0001/2025/IntrekkingClimate2025"
        );
        assert_eq!(
            goal(Scenario::HandOver),
            "/join/id/proces/gm0001/2025/DoorleveringClimate2025"
        );
    }

    #[test]
    fn test_anchor_dates() {
        let pkg = package();
        let analysis = analyze(&pkg);
        let options = TransformOptions::default();
        let anchor = |scenario| {
            process(scenario, &pkg, &analysis, &options, &clock())
                .unwrap()
                .anchor_date
        };
        assert_eq!(anchor(Scenario::Publication), NaiveDate::from_ymd_opt(2025, 6, 3).unwrap());
        assert_eq!(anchor(Scenario::HandOver), NaiveDate::from_ymd_opt(2025, 6, 9).unwrap());
    }

    #[test]
    fn test_scenario_tables() {
        assert_eq!(Scenario::Validation.submission_root(), "validatieOpdracht");
        assert_eq!(Scenario::Withdrawal.submission_root(), "publicatieOpdracht");
        assert_eq!(
            Scenario::Withdrawal.geo_renames().get("divisieteksten.xml"),
            Some(&"owDivisietekstmarkers.xml")
        );
        assert_eq!(Scenario::HandOver.to_string(), "doorlevering");
    }
}
