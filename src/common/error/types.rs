//! Unified error type for package transformations.
//!
//! Only two conditions are fatal by contract: a source package that does not
//! exist and a package without a recognisable authority. Everything else that
//! can go wrong is a malformed archive or document.
use thiserror::Error;

/// Main error type for stoppack operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The source package does not exist
    #[error("Source package not found: {0}")]
    InputNotFound(String),

    /// No authority code could be derived from the package metadata.
    ///
    /// Every generated document depends on it, so no scenario can proceed.
    #[error("Missing authority: the package metadata does not name a recognised maker")]
    MissingAuthority,

    /// The archive could not be read as a ZIP container
    #[error("Invalid archive: {0}")]
    InvalidArchive(String),

    /// An entry that was expected to exist is absent
    #[error("Entry not found: {0}")]
    EntryNotFound(String),

    /// XML document is malformed
    #[error("XML error: {0}")]
    XmlError(String),

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    ZipError(#[from] zip::result::ZipError),

    /// Low-level quick-xml error
    #[error("Quick-XML error: {0}")]
    QuickXmlError(#[from] quick_xml::Error),

    /// UTF-8 conversion error
    #[error("UTF-8 conversion error: {0}")]
    Utf8Error(#[from] std::str::Utf8Error),

    /// A date could not be represented (ZIP timestamps cover 1980-2107)
    #[error("Date out of range: {0}")]
    DateOutOfRange(String),
}

impl Error {
    /// Whether this error belongs to the fatal precondition class that is
    /// raised before any output is produced.
    pub fn is_precondition(&self) -> bool {
        matches!(self, Error::InputNotFound(_) | Error::MissingAuthority)
    }
}

/// Result type for stoppack operations.
pub type Result<T> = std::result::Result<T, Error>;
