//! Stoppack - transform regulation packages into delivery packages
//!
//! A source package is a ZIP archive holding a regulation (`Regeling/`), its
//! information objects (`IO-*/`) and its geo-object files (`OW-bestanden/`).
//! This library turns one source package into one delivery package for a
//! publication, a validation, a withdrawal or a hand-over.
//!
//! # Features
//!
//! - **Analysis**: Extract identifiers, the authority, information objects and
//!   their cross-references from a source package
//! - **Scenarios**: Generate the decision, submission order and other delivery
//!   documents for each scenario
//! - **Withdrawal**: Mark every geo object as terminated
//! - **Assembly**: Copy what the scenario keeps, under unique names, and write a
//!   fresh package manifest
//! - **Deterministic output**: Under a [`common::FixedClock`] the output
//!   package is byte-for-byte reproducible
//!
//! # Example - Publishing a package
//!
//! ```no_run
//! use stoppack::common::SystemClock;
//! use stoppack::config::TransformOptions;
//! use stoppack::scenario::Scenario;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let outcome = stoppack::transform::run(
//!     "programma.zip",
//!     None,
//!     Scenario::Publication,
//!     &TransformOptions::default(),
//!     &SystemClock,
//! )?;
//!
//! println!("Goal: {}", outcome.result.goal_id);
//! for entry in outcome.manifest.entries() {
//!     println!("{} ({})", entry.file_name, entry.content_type);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Analyzing a package
//!
//! ```no_run
//! use stoppack::package::SourcePackage;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let package = SourcePackage::open("programma.zip")?;
//! let analysis = stoppack::analysis::analyze(&package);
//!
//! println!("Work: {:?}", analysis.work_id);
//! for record in &analysis.information_objects {
//!     println!("{}: {:?}", record.folder, record.payload_file);
//! }
//! # Ok(())
//! # }
//! ```

/// Source package analysis
pub mod analysis;

/// Shared infrastructure: errors, clock and XML handling
pub mod common;

/// Transformation options
pub mod config;

/// Source and output packages
pub mod package;

/// Plain-text transformation report
pub mod report;

/// Scenario processors
pub mod scenario;

/// Transformation driver
pub mod transform;

pub use common::{Error, Result};
pub use config::TransformOptions;
pub use scenario::Scenario;
pub use transform::{TransformOutcome, run, transform_bytes};
