//! Source package (ZIP archive) reading.
//!
//! A source package is read completely into memory when it is opened: entry
//! names, directory markers and contents are kept in archive order. The ZIP
//! handle itself never outlives [`SourcePackage::from_reader`], so nothing has
//! to be released on the error paths of a transformation.

use crate::common::{Error, Result};
use crate::package::entry_path::EntryPath;
use std::io::{Read, Seek};
use std::path::Path;

/// Upper bound on the buffer reserved up front for one entry; the declared
/// size in the archive header is not trusted beyond this.
const MAX_PREALLOCATION: u64 = 1 << 20;

/// One entry of a source package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    name: String,
    is_dir: bool,
    data: Vec<u8>,
}

impl SourceEntry {
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        let name = name.into();
        let is_dir = EntryPath::new(&name).is_dir_marker();
        Self { name, is_dir, data }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> EntryPath<'_> {
        EntryPath::new(&self.name)
    }

    pub fn is_dir(&self) -> bool {
        self.is_dir
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Uncompressed size in bytes.
    pub fn len(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// An opened source package.
#[derive(Debug, Clone, Default)]
pub struct SourcePackage {
    entries: Vec<SourceEntry>,
}

impl SourcePackage {
    /// Open a source package from a file path.
    ///
    /// # Errors
    /// Returns [`Error::InputNotFound`] if the file doesn't exist and
    /// [`Error::InvalidArchive`] if it isn't a readable ZIP archive.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.is_file() {
            return Err(Error::InputNotFound(path.display().to_string()));
        }

        let data = std::fs::read(path)?;
        Self::from_bytes(data)
    }

    /// Read a source package from owned bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_reader(std::io::Cursor::new(data))
    }

    /// Read a source package from any seekable reader.
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = zip::ZipArchive::new(reader)
            .map_err(|e| Error::InvalidArchive(e.to_string()))?;

        let mut entries = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            let name = file.name().to_string();
            let is_dir = file.is_dir();

            let mut data = Vec::with_capacity(capacity_hint(file.size()));
            if !is_dir {
                file.read_to_end(&mut data)?;
            }
            entries.push(SourceEntry { name, is_dir, data });
        }

        Ok(Self { entries })
    }

    /// Build a package from in-memory entries, in the given order.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<u8>)>,
        S: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(name, data)| SourceEntry::new(name, data))
                .collect(),
        }
    }

    /// All entries in archive order, directory markers included.
    pub fn entries(&self) -> &[SourceEntry] {
        &self.entries
    }

    /// Entries that are files, in archive order.
    pub fn files(&self) -> impl Iterator<Item = &SourceEntry> {
        self.entries.iter().filter(|entry| !entry.is_dir)
    }

    /// Look up a file by name, ignoring ASCII case.
    pub fn find(&self, name: &str) -> Option<&SourceEntry> {
        self.files().find(|entry| entry.name.eq_ignore_ascii_case(name))
    }

    /// Contents of a file looked up by name, ignoring ASCII case.
    pub fn read(&self, name: &str) -> Result<&[u8]> {
        self.find(name)
            .map(SourceEntry::data)
            .ok_or_else(|| Error::EntryNotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn capacity_hint(declared: u64) -> usize {
    usize::try_from(declared.min(MAX_PREALLOCATION)).unwrap_or(0)
}
