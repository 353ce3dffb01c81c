//! Output package writing.
//!
//! The output archive is assembled completely in memory. Every entry gets the
//! same modification time taken from the injected clock, so the same input
//! and clock always produce the same bytes. Nothing touches the file system
//! until [`commit`] writes the finished archive in one go.

use crate::common::{Error, Result};
use crate::config::Compression;
use crate::package::entries::OutputEntries;
use crate::package::manifest::Manifest;
use crate::package::constants::path;
use chrono::{Datelike, NaiveDateTime, Timelike};
use std::io::{Seek, Write};
use std::path::Path;
use zip::write::{SimpleFileOptions, ZipWriter};

/// Builder for output packages (ZIP archives)
pub struct PackageWriter<W: Write + Seek> {
    zip_writer: ZipWriter<W>,
    options: SimpleFileOptions,
}

impl PackageWriter<std::io::Cursor<Vec<u8>>> {
    /// Create a new package writer that writes to memory
    pub fn new(timestamp: NaiveDateTime, compression: Compression) -> Result<Self> {
        Self::with_writer(std::io::Cursor::new(Vec::new()), timestamp, compression)
    }

    /// Finish writing and return the bytes
    pub fn finish_to_bytes(self) -> Result<Vec<u8>> {
        let cursor = self.finish()?;
        Ok(cursor.into_inner())
    }
}

impl<W: Write + Seek> PackageWriter<W> {
    /// Create a new package writer with a custom writer
    pub fn with_writer(writer: W, timestamp: NaiveDateTime, compression: Compression) -> Result<Self> {
        let options = SimpleFileOptions::default()
            .compression_method(compression.method())
            .last_modified_time(zip_timestamp(timestamp)?)
            .unix_permissions(0o644);

        Ok(Self {
            zip_writer: ZipWriter::new(writer),
            options,
        })
    }

    /// Add a file to the package
    pub fn add_file(&mut self, name: &str, content: &[u8]) -> Result<()> {
        self.zip_writer.start_file(name, self.options)?;
        self.zip_writer.write_all(content)?;
        Ok(())
    }

    /// Write every entry in order, then the manifest.
    pub fn add_entries(&mut self, entries: &OutputEntries, manifest: &Manifest) -> Result<()> {
        for entry in entries {
            self.add_file(&entry.name, &entry.content)?;
        }
        self.add_file(path::MANIFEST, manifest.to_xml().as_bytes())
    }

    /// Finish the ZIP archive and return the underlying writer
    pub fn finish(self) -> Result<W> {
        let writer = self.zip_writer.finish()?;
        Ok(writer)
    }
}

/// Serialize a complete output package.
pub fn package_bytes(
    entries: &OutputEntries,
    manifest: &Manifest,
    timestamp: NaiveDateTime,
    compression: Compression,
) -> Result<Vec<u8>> {
    let mut writer = PackageWriter::new(timestamp, compression)?;
    writer.add_entries(entries, manifest)?;
    writer.finish_to_bytes()
}

/// Write finished package bytes to `path`.
///
/// The bytes are staged next to the target and renamed into place, so an
/// interrupted write never leaves a truncated archive under the final name.
pub fn commit<P: AsRef<Path>>(path: P, bytes: &[u8]) -> Result<()> {
    let path = path.as_ref();
    let mut staging = path.as_os_str().to_owned();
    staging.push(".partial");
    let staging = std::path::PathBuf::from(staging);

    if let Err(err) = std::fs::write(&staging, bytes) {
        let _ = std::fs::remove_file(&staging);
        return Err(err.into());
    }
    std::fs::rename(&staging, path).map_err(|err| {
        let _ = std::fs::remove_file(&staging);
        Error::Io(err)
    })
}

fn zip_timestamp(timestamp: NaiveDateTime) -> Result<zip::DateTime> {
    let year = u16::try_from(timestamp.year())
        .map_err(|_| Error::DateOutOfRange(timestamp.to_string()))?;
    zip::DateTime::from_date_and_time(
        year,
        timestamp.month() as u8,
        timestamp.day() as u8,
        timestamp.hour() as u8,
        timestamp.minute() as u8,
        timestamp.second() as u8,
    )
    .map_err(|_| Error::DateOutOfRange(timestamp.to_string()))
}
