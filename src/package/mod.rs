//! Source and output packages.
//!
//! This module covers everything archive-shaped: reading a source package
//! into memory, classifying its entry names, the copy policy that turns it
//! into an ordered output entry set, the output manifest and the archive
//! writer.
//!
//! # Example
//!
//! ```no_run
//! use stoppack::package::SourcePackage;
//!
//! let package = SourcePackage::open("programma.zip")?;
//! for entry in package.files() {
//!     println!("{} ({} bytes)", entry.name(), entry.len());
//! }
//! # Ok::<(), stoppack::common::Error>(())
//! ```

/// Assembly of the output entry set
pub mod assembler;
/// Package layout conventions
pub mod constants;
/// Ordered output entries
pub mod entries;
/// Entry name classification
pub mod entry_path;
/// Output manifest
pub mod manifest;
/// Source package reading
pub mod source;
/// Output package writing
pub mod writer;

pub use assembler::{Placement, assemble, place};
pub use entries::{EntryOrigin, OutputEntries, OutputEntry};
pub use entry_path::EntryPath;
pub use manifest::{Manifest, ManifestEntry, guess_content_type};
pub use source::{SourceEntry, SourcePackage};
pub use writer::{PackageWriter, commit, package_bytes};
