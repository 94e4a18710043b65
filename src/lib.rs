//! Scrubber - directory cleanup engine
//!
//! Scrubber cleans up configured directories by deleting or zipping files that are too old
//! or too large, while leaving the most recent files alone.
//!
//! ## Pipeline
//!
//! For every configured directory (a path or a glob of paths):
//! 1. list the files in the directory (not recursive)
//! 2. drop everything that isn't a regular file or fails the include/exclude rules
//! 3. exempt the `keep_latest` most recently modified files
//! 4. run each strategy in order; files removed by one strategy are gone for the next
//!
//! Limits are parsed when a strategy runs, so a bad limit stops the run right before the
//! first action it would have guarded.

pub mod action;
pub mod archive;
pub mod cleanup;
pub mod config;
pub mod error;
pub mod filter;
pub mod fs;
pub mod scanner;
pub mod size;
pub mod strategy;
pub mod time;

// Re-export commonly used items
pub use action::{action_from_config, DeleteAction, Performer, ZipAction};
pub use cleanup::{RunReport, Scrubber};
pub use config::{
    load_config, CleanupConfig, DirectoryConfig, StrategyAction, StrategyConfig, StrategyType,
    DEFAULT_CONFIG_FILE,
};
pub use error::{Result, ScrubError};
pub use filter::{apply_keep_latest, filter_files};
pub use fs::{EntryKind, FileEntry, Filesystem, OsFilesystem};
pub use scanner::{DirectoryReport, DirectoryScanner};
pub use size::parse_size_limit;
pub use strategy::Threshold;
pub use time::parse_age_limit;
