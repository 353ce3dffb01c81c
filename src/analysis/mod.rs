//! Source package analysis.
//!
//! [`analyze`] reads the identification, snapshot, metadata and free-text
//! documents of the regulation, discovers the information-object folders and
//! resolves the references between them into an immutable [`ArchiveAnalysis`].
//!
//! # Example
//!
//! ```no_run
//! use stoppack::analysis::analyze;
//! use stoppack::package::SourcePackage;
//!
//! let package = SourcePackage::open("programma.zip")?;
//! let analysis = analyze(&package);
//! println!("{:?}", analysis.work_id);
//! # Ok::<(), stoppack::common::Error>(())
//! ```

mod analyzer;
mod model;
pub mod references;

pub(crate) use analyzer::load;
pub use analyzer::{analyze, lookup, parse_authority, select_payload, sha512_hex};
pub use model::{
    AnalysisBuilder, ArchiveAnalysis, Authority, ExternalReference, InformationObjectRecord,
};
