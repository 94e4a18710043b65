//! Cleanup configuration loaded from a TOML file.

use crate::error::{Result, ScrubError};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;

/// Default config file name, looked up relative to the working directory
pub const DEFAULT_CONFIG_FILE: &str = "scrubber.config.toml";

/// Top-level structure of the config file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CleanupConfig {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, rename = "directory")]
    pub directories: Vec<DirectoryConfig>,
}

/// Cleanup settings for one directory (or one glob of directories)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DirectoryConfig {
    #[serde(default)]
    pub name: String,
    pub path: String,
    /// When present, only these extensions are considered, even if the list is empty
    #[serde(default)]
    pub include: Option<Vec<String>>,
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default, rename = "strategy")]
    pub strategies: Vec<StrategyConfig>,
    /// Number of most recent files that are never touched; values below 1 disable it
    #[serde(default, alias = "keepLatest", alias = "keeplatest")]
    pub keep_latest: i64,
}

impl DirectoryConfig {
    /// A copy of this directory config pointing at a concrete, resolved path
    pub fn with_path(&self, path: impl Into<String>) -> DirectoryConfig {
        DirectoryConfig {
            path: path.into(),
            ..self.clone()
        }
    }

    /// Name for log output, falling back to the path
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.path
        } else {
            &self.name
        }
    }
}

/// One threshold rule: which files match, and what happens to them
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StrategyConfig {
    #[serde(rename = "type")]
    pub kind: StrategyType,
    pub action: StrategyAction,
    /// Parsed when the rule runs, not at load time
    #[serde(default)]
    pub limit: String,
}

/// How matching files are selected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyType {
    Age,
    Size,
}

/// What happens to matching files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyAction {
    Delete,
    #[serde(alias = "archive")]
    Zip,
}

impl fmt::Display for StrategyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyType::Age => write!(f, "age"),
            StrategyType::Size => write!(f, "size"),
        }
    }
}

impl fmt::Display for StrategyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyAction::Delete => write!(f, "delete"),
            StrategyAction::Zip => write!(f, "zip"),
        }
    }
}

impl CleanupConfig {
    /// Parse config from TOML text. `origin` is only used for error context.
    pub fn from_toml(text: &str, origin: &Path) -> Result<Self> {
        toml::from_str(text).map_err(|source| ScrubError::Config {
            path: origin.to_path_buf(),
            source,
        })
    }
}

/// Read and parse a config file
pub fn load_config(path: &Path) -> Result<CleanupConfig> {
    let text = fs::read_to_string(path).map_err(|source| ScrubError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    CleanupConfig::from_toml(&text, path)
}
