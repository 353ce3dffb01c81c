/// Configuration types for package transformations.
///
/// The domain conventions of source and output packages are fixed (see
/// [`crate::package::constants`]); this module only holds the few knobs a
/// caller may turn.
use crate::package::constants::default;

/// Configuration options for a transformation.
///
/// # Examples
///
/// ```rust
/// use stoppack::config::{Compression, TransformOptions};
///
/// // Create with defaults
/// let options = TransformOptions::default();
///
/// // Or customize
/// let options = TransformOptions::new()
///     .with_compression(Compression::Stored)
///     .with_default_program("Omgevingsprogramma")
///     .with_report(false);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOptions {
    /// How entries of the output archive are compressed
    pub compression: Compression,
    /// Program token used when the work identifier does not supply one
    pub default_program: String,
    /// Whether to write the plain-text report next to the output package
    pub write_report: bool,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            compression: Compression::Deflated,
            default_program: default::PROGRAM_NAME.to_string(),
            write_report: true,
        }
    }
}

impl TransformOptions {
    /// Create a new `TransformOptions` with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the compression method of the output archive.
    #[inline]
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Set the fallback program token.
    ///
    /// An empty token is ignored and the built-in default is kept.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stoppack::config::TransformOptions;
    ///
    /// let options = TransformOptions::new().with_default_program("");
    /// assert_eq!(options.default_program, "Programma");
    /// ```
    #[inline]
    pub fn with_default_program(mut self, program: impl Into<String>) -> Self {
        let program = program.into();
        if !program.trim().is_empty() {
            self.default_program = program.trim().to_string();
        }
        self
    }

    /// Set whether the companion report is written.
    #[inline]
    pub fn with_report(mut self, write: bool) -> Self {
        self.write_report = write;
        self
    }
}

/// Compression of output archive entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    /// Deflate every entry.
    #[default]
    Deflated,
    /// Store entries uncompressed.
    Stored,
}

impl Compression {
    pub fn method(self) -> zip::CompressionMethod {
        match self {
            Compression::Deflated => zip::CompressionMethod::Deflated,
            Compression::Stored => zip::CompressionMethod::Stored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_options_builder() {
        let options = TransformOptions::new()
            .with_compression(Compression::Stored)
            .with_default_program("  Omgevingsprogramma ")
            .with_report(false);

        assert_eq!(options.compression, Compression::Stored);
        assert_eq!(options.default_program, "Omgevingsprogramma");
        assert!(!options.write_report);
    }

    #[test]
    fn test_transform_options_default() {
        let options = TransformOptions::default();
        assert_eq!(options.compression, Compression::Deflated);
        assert_eq!(options.default_program, "Programma");
        assert!(options.write_report);
    }

    #[test]
    fn test_compression_method() {
        assert_eq!(Compression::Stored.method(), zip::CompressionMethod::Stored);
        assert_eq!(Compression::Deflated.method(), zip::CompressionMethod::Deflated);
    }
}
