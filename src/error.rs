//! Error types for the cleanup engine.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type used throughout the library.
pub type Result<T> = std::result::Result<T, ScrubError>;

/// Errors that abort a cleanup run (or a config load).
///
/// Per-file failures during an action are not represented here: they are logged and
/// the file stays in the working set.
#[derive(Debug, Error)]
pub enum ScrubError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The configuration file is not valid TOML or names an unknown strategy/action.
    #[error("failed to parse config file {path}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// An age limit did not match the `<n><unit> ...` grammar.
    #[error("invalid age limit {limit:?}: {reason}")]
    InvalidAgeLimit { limit: String, reason: String },

    /// A size limit could not be parsed or is not positive.
    #[error("invalid size limit {limit:?}: {reason}")]
    InvalidSizeLimit { limit: String, reason: String },

    /// A configured path is not a valid glob pattern.
    #[error("invalid path pattern {pattern:?}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    /// A path matched by a glob pattern could not be inspected.
    #[error("failed to inspect {path}")]
    Expand {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Listing the files of a resolved directory failed.
    #[error("failed to read files in directory {path}")]
    Scan {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing the single-file archive failed; the original was left untouched.
    #[error("failed to create archive {path}")]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },
}

impl ScrubError {
    pub(crate) fn age_limit(limit: &str, reason: impl Into<String>) -> Self {
        ScrubError::InvalidAgeLimit {
            limit: limit.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn size_limit(limit: &str, reason: impl Into<String>) -> Self {
        ScrubError::InvalidSizeLimit {
            limit: limit.to_string(),
            reason: reason.into(),
        }
    }

    /// True for errors caused by a bad limit string in a strategy.
    pub fn is_limit_error(&self) -> bool {
        matches!(
            self,
            ScrubError::InvalidAgeLimit { .. } | ScrubError::InvalidSizeLimit { .. }
        )
    }
}
