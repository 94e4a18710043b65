//! Filesystem access used by the cleanup pipeline.
//!
//! Everything the engine does to disk goes through the [`Filesystem`] trait so the
//! pipeline can be driven against an in-memory mock in tests.

use std::fs::{self, File, Metadata};
use std::io::{self, Read, Seek, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use walkdir::WalkDir;

/// What kind of entry a [`FileEntry`] describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
    Symlink,
    Other,
}

/// A file found in a cleanup directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    pub size: u64,
    pub modified: SystemTime,
    pub kind: EntryKind,
}

impl FileEntry {
    pub fn new(name: impl Into<String>, size: u64, modified: SystemTime, kind: EntryKind) -> Self {
        FileEntry {
            name: name.into(),
            size,
            modified,
            kind,
        }
    }

    /// Build an entry from already-fetched metadata
    pub fn from_metadata(name: impl Into<String>, metadata: &Metadata) -> io::Result<Self> {
        let file_type = metadata.file_type();
        let kind = if file_type.is_symlink() {
            EntryKind::Symlink
        } else if file_type.is_dir() {
            EntryKind::Dir
        } else if file_type.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        };

        Ok(FileEntry {
            name: name.into(),
            size: metadata.len(),
            modified: metadata.modified()?,
            kind,
        })
    }

    /// Only regular files are ever cleanup candidates
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }
}

/// Writer handed out by [`Filesystem::create`]. Zip archives need to seek back to
/// patch local headers, so plain `Write` is not enough.
pub trait WriteSeek: Write + Seek {}

impl<T: Write + Seek> WriteSeek for T {}

/// The minimal set of filesystem operations the pipeline needs.
pub trait Filesystem {
    /// List the direct children of `dir`, without following symlinks.
    fn list_files(&self, dir: &Path) -> io::Result<Vec<FileEntry>>;

    /// Combine a directory and an entry name into a full path.
    fn full_path(&self, file: &FileEntry, dir: &Path) -> PathBuf {
        dir.join(&file.name)
    }

    fn remove(&self, path: &Path) -> io::Result<()>;

    fn open(&self, path: &Path) -> io::Result<Box<dyn Read>>;

    fn create(&self, path: &Path) -> io::Result<Box<dyn WriteSeek>>;

    /// Metadata for `path`, following symlinks.
    fn stat(&self, path: &Path) -> io::Result<FileEntry>;

    /// The extension of an entry, including the leading dot ("" when there is none).
    fn ext(&self, file: &FileEntry) -> String {
        extension(&file.name).to_string()
    }
}

/// Everything from the last '.' of a file name onward
pub fn extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(pos) => &name[pos..],
        None => "",
    }
}

/// [`Filesystem`] backed by the real OS filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFilesystem;

impl Filesystem for OsFilesystem {
    fn list_files(&self, dir: &Path) -> io::Result<Vec<FileEntry>> {
        let mut files = Vec::new();

        // One level only, sorted so scan order does not depend on the OS
        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .sort_by_file_name()
        {
            let entry = entry?;
            let metadata = entry.metadata()?;
            let name = entry.file_name().to_string_lossy().into_owned();
            files.push(FileEntry::from_metadata(name, &metadata)?);
        }

        Ok(files)
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn open(&self, path: &Path) -> io::Result<Box<dyn Read>> {
        Ok(Box::new(File::open(path)?))
    }

    fn create(&self, path: &Path) -> io::Result<Box<dyn WriteSeek>> {
        Ok(Box::new(File::create(path)?))
    }

    fn stat(&self, path: &Path) -> io::Result<FileEntry> {
        let metadata = fs::metadata(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        FileEntry::from_metadata(name, &metadata)
    }
}
