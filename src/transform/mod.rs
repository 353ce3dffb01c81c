//! Transformation driver.
//!
//! One call reads one source package and produces one output package:
//! analyze, run the scenario processor, assemble the entry set, build the
//! manifest and write the archive. The archive is built completely in memory
//! and written to disk in a single commit after the manifest exists, so a
//! failed run never leaves a partial output package behind.
//!
//! # Example
//!
//! ```no_run
//! use stoppack::common::SystemClock;
//! use stoppack::config::TransformOptions;
//! use stoppack::scenario::Scenario;
//! use stoppack::transform;
//!
//! let outcome = transform::run(
//!     "programma.zip",
//!     None,
//!     Scenario::Publication,
//!     &TransformOptions::default(),
//!     &SystemClock,
//! )?;
//! println!("wrote {} entries", outcome.manifest.entries().len());
//! # Ok::<(), stoppack::common::Error>(())
//! ```

use crate::analysis::{ArchiveAnalysis, analyze};
use crate::common::{Clock, Result};
use crate::config::TransformOptions;
use crate::package::{Manifest, OutputEntries, SourcePackage, assemble, commit, package_bytes};
use crate::report;
use crate::scenario::{self, Scenario, ScenarioResult};
use std::path::{Path, PathBuf};


/// Result of one transformation.
#[derive(Debug, Clone)]
pub struct TransformOutcome {
    pub scenario: Scenario,
    pub analysis: ArchiveAnalysis,
    pub result: ScenarioResult,
    /// Final entry set, in archive order (the manifest itself excluded)
    pub entries: OutputEntries,
    pub manifest: Manifest,
    /// The complete output archive
    pub bytes: Vec<u8>,
    /// Where the archive was written, if it was
    pub output_path: Option<PathBuf>,
    /// Where the report was written, if it was
    pub report_path: Option<PathBuf>,
}

/// Transform an opened source package in memory.
///
/// # Errors
/// Fails with [`Error::MissingAuthority`](crate::common::Error::MissingAuthority)
/// before anything is assembled when the package names no authority.
pub fn transform_package<C: Clock>(
    source: &SourcePackage,
    scenario: Scenario,
    options: &TransformOptions,
    clock: &C,
) -> Result<TransformOutcome> {
    let analysis = analyze(source);
    let result = scenario::process(scenario, source, &analysis, options, clock)?;

    let entries = assemble(source, &result, &analysis);
    let manifest = Manifest::build(&entries, scenario.is_withdrawal());
    let bytes = package_bytes(
        &entries,
        &manifest,
        clock.now().naive_utc(),
        options.compression,
    )?;

    Ok(TransformOutcome {
        scenario,
        analysis,
        result,
        entries,
        manifest,
        bytes,
        output_path: None,
        report_path: None,
    })
}

/// Transform source package bytes in memory.
pub fn transform_bytes<C: Clock>(
    source: Vec<u8>,
    scenario: Scenario,
    options: &TransformOptions,
    clock: &C,
) -> Result<TransformOutcome> {
    let source = SourcePackage::from_bytes(source)?;
    transform_package(&source, scenario, options, clock)
}

/// Transform the package at `source_path` and write the output package.
///
/// Without `output_path` the output goes next to the source under
/// [`default_output_path`]. The report, when enabled, goes next to the
/// output under [`report_path`]; failing to write it is logged and does not
/// fail the run.
///
/// # Errors
/// Fails with [`Error::InputNotFound`](crate::common::Error::InputNotFound)
/// when the source does not exist, and with
/// [`Error::MissingAuthority`](crate::common::Error::MissingAuthority) when it
/// names no authority; in both cases nothing is written.
pub fn run<C: Clock>(
    source_path: impl AsRef<Path>,
    output_path: Option<&Path>,
    scenario: Scenario,
    options: &TransformOptions,
    clock: &C,
) -> Result<TransformOutcome> {
    let source_path = source_path.as_ref();
    let span = tracing::info_span!("transform", source = %source_path.display(), %scenario);
    let _guard = span.enter();

    let source = SourcePackage::open(source_path)?;
    let mut outcome = transform_package(&source, scenario, options, clock)?;

    let output = output_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output_path(source_path, scenario));
    commit(&output, &outcome.bytes)?;
    tracing::info!(
        output = %output.display(),
        entries = outcome.manifest.entries().len(),
        bytes = outcome.bytes.len(),
        "output package written"
    );

    if options.write_report {
        let target = report_path(&output);
        match std::fs::write(&target, report::render(&outcome)) {
            Ok(()) => outcome.report_path = Some(target),
            Err(err) => {
                tracing::warn!(report = %target.display(), error = %err, "could not write report")
            },
        }
    }

    outcome.output_path = Some(output);
    Ok(outcome)
}

/// Open and analyze a source package without transforming it.
pub fn inspect(source_path: impl AsRef<Path>) -> Result<ArchiveAnalysis> {
    let source = SourcePackage::open(source_path)?;
    Ok(analyze(&source))
}

/// Default output path: `{stem}-{scenario label}.zip` next to the source.
///
/// # Examples
///
/// ```rust
/// use std::path::Path;
/// use stoppack::scenario::Scenario;
/// use stoppack::transform::default_output_path;
///
/// let out = default_output_path(Path::new("/data/programma.zip"), Scenario::Withdrawal);
/// assert_eq!(out, Path::new("/data/programma-intrekking.zip"));
/// ```
pub fn default_output_path(source: &Path, scenario: Scenario) -> PathBuf {
    sibling(source, &format!("{}-{}.zip", stem(source), scenario.label()))
}

/// Report path: `{output stem}-rapport.txt` next to the output.
pub fn report_path(output: &Path) -> PathBuf {
    sibling(output, &format!("{}-rapport.txt", stem(output)))
}

fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn sibling(path: &Path, file_name: &str) -> PathBuf {
    match path.parent() {
        Some(parent) => parent.join(file_name),
        None => PathBuf::from(file_name),
    }
}
