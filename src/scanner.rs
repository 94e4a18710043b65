//! Per-directory cleanup pipeline: scan, filter, keep-latest, then each strategy in order.

use crate::action::action_from_config;
use crate::config::DirectoryConfig;
use crate::error::{Result, ScrubError};
use crate::filter::{apply_keep_latest, filter_files};
use crate::fs::{FileEntry, Filesystem};
use crate::strategy::Threshold;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info};

/// What happened in one resolved directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryReport {
    pub path: PathBuf,
    /// Files left after include/exclude and keep-latest
    pub candidates: usize,
    /// Files deleted or zipped (the original is gone)
    pub processed: usize,
    /// Total size of the processed originals
    pub processed_bytes: u64,
}

/// Runs the cleanup pipeline for one directory
pub struct DirectoryScanner<'a> {
    dir: &'a DirectoryConfig,
    fs: &'a dyn Filesystem,
    pretend: bool,
}

impl<'a> DirectoryScanner<'a> {
    pub fn new(dir: &'a DirectoryConfig, fs: &'a dyn Filesystem, pretend: bool) -> Self {
        DirectoryScanner { dir, fs, pretend }
    }

    fn path(&self) -> &Path {
        Path::new(&self.dir.path)
    }

    /// All entries directly inside the directory
    pub fn get_files(&self) -> Result<Vec<FileEntry>> {
        self.fs
            .list_files(self.path())
            .map_err(|source| ScrubError::Scan {
                path: self.path().to_path_buf(),
                source,
            })
    }

    /// Apply include/exclude rules, then exempt the most recent files
    pub fn select_candidates(&self, files: Vec<FileEntry>) -> Vec<FileEntry> {
        let files = filter_files(
            self.fs,
            files,
            self.dir.include.as_deref(),
            &self.dir.exclude,
        );
        apply_keep_latest(files, self.dir.keep_latest)
    }

    /// Run every strategy in order over the working set.
    ///
    /// Files removed by one strategy are not seen by the next. A limit that fails to
    /// parse aborts before its action touches anything.
    pub fn apply_strategies(&self, mut files: Vec<FileEntry>) -> Result<Vec<FileEntry>> {
        for strategy in &self.dir.strategies {
            let threshold = Threshold::from_config(strategy)?;
            let matches = threshold.matcher(SystemTime::now());
            let action = action_from_config(strategy.action, self.path(), self.fs, self.pretend);

            debug!(
                "Applying {} strategy ({}, limit {:?}) to {} files",
                strategy.kind,
                strategy.action,
                strategy.limit,
                files.len()
            );
            files = action.perform(files, &matches)?;
        }
        Ok(files)
    }

    /// Scan, filter and clean the directory
    pub fn process(&self) -> Result<DirectoryReport> {
        info!("Scanning for files in {}...", self.dir.path);

        let files = self.get_files()?;
        let candidates = self.select_candidates(files);

        let mut report = DirectoryReport {
            path: self.path().to_path_buf(),
            candidates: candidates.len(),
            ..Default::default()
        };

        if candidates.is_empty() {
            info!("Found no files to process. Skipping {}", self.dir.path);
            return Ok(report);
        }

        info!("Found {} files to process", candidates.len());

        let total_bytes: u64 = candidates.iter().map(|f| f.size).sum();
        let remaining = self.apply_strategies(candidates)?;
        let remaining_bytes: u64 = remaining.iter().map(|f| f.size).sum();

        report.processed = report.candidates - remaining.len();
        report.processed_bytes = total_bytes - remaining_bytes;
        Ok(report)
    }
}
