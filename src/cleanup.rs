//! A full cleanup run over every configured directory.

use crate::config::CleanupConfig;
use crate::error::{Result, ScrubError};
use crate::fs::Filesystem;
use crate::scanner::{DirectoryReport, DirectoryScanner};
use glob::MatchOptions;
use std::path::PathBuf;
use tracing::{error, info, warn};

/// `*` and `?` stay within one path component, like shell globs
const GLOB_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Results of a whole run
#[derive(Debug, Default)]
pub struct RunReport {
    /// One entry per resolved directory, in processing order
    pub directories: Vec<DirectoryReport>,
    /// Configured paths that were skipped (bad pattern or no matching directory)
    pub skipped: Vec<String>,
}

impl RunReport {
    pub fn total_processed(&self) -> usize {
        self.directories.iter().map(|d| d.processed).sum()
    }

    pub fn total_processed_bytes(&self) -> u64 {
        self.directories.iter().map(|d| d.processed_bytes).sum()
    }
}

/// Cleans up every directory of a configuration, one after the other
pub struct Scrubber<F: Filesystem> {
    config: CleanupConfig,
    fs: F,
    pretend: bool,
}

impl<F: Filesystem> Scrubber<F> {
    pub fn new(config: CleanupConfig, fs: F, pretend: bool) -> Self {
        Scrubber {
            config,
            fs,
            pretend,
        }
    }

    pub fn is_pretend(&self) -> bool {
        self.pretend
    }

    /// Expand a configured path as a glob and keep only the directories.
    ///
    /// Directories the glob walk can't read are logged and left out; a match that
    /// can't be inspected fails the whole expansion.
    pub fn expand_dirs(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        let paths = glob::glob_with(pattern, GLOB_OPTIONS).map_err(|source| {
            ScrubError::Pattern {
                pattern: pattern.to_string(),
                source,
            }
        })?;

        let mut dirs = Vec::new();
        for entry in paths {
            let path = match entry {
                Ok(path) => path,
                Err(err) => {
                    warn!(
                        "Could not read {} while expanding {}: {}",
                        err.path().display(),
                        pattern,
                        err.error()
                    );
                    continue;
                }
            };

            let info = self.fs.stat(&path).map_err(|source| ScrubError::Expand {
                path: path.clone(),
                source,
            })?;

            if info.is_dir() {
                dirs.push(path);
            }
        }

        Ok(dirs)
    }

    /// Process every configured directory.
    ///
    /// Paths that can't be expanded are logged and skipped; any error inside a resolved
    /// directory stops the run.
    pub fn run(&self) -> Result<RunReport> {
        let mut report = RunReport::default();

        for config_dir in &self.config.directories {
            let expanded = match self.expand_dirs(&config_dir.path) {
                Ok(dirs) => dirs,
                Err(err) => {
                    error!("[ERROR] Failed to expand path {}: {}", config_dir.path, err);
                    report.skipped.push(config_dir.path.clone());
                    continue;
                }
            };

            if expanded.is_empty() {
                info!(
                    "Found no directories to process. Skipping {} ({})",
                    config_dir.path,
                    config_dir.display_name()
                );
                report.skipped.push(config_dir.path.clone());
                continue;
            }

            for path in expanded {
                let dir = config_dir.with_path(path.to_string_lossy());
                let scanner = DirectoryScanner::new(&dir, &self.fs, self.pretend);
                report.directories.push(scanner.process()?);
            }
        }

        Ok(report)
    }
}
