//! Threshold rules: turning a configured strategy into a file predicate.

use crate::config::{StrategyConfig, StrategyType};
use crate::error::Result;
use crate::fs::FileEntry;
use crate::size::{exceeds_size, parse_size_limit};
use crate::time::{deadline, is_past_deadline, parse_age_limit};
use std::time::{Duration, SystemTime};

/// A parsed strategy limit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Threshold {
    /// Files older than this are matched
    Age(Duration),
    /// Files larger than this many bytes are matched
    Size(u64),
}

impl Threshold {
    /// Parse the limit text of a strategy according to its type
    pub fn parse(kind: StrategyType, limit: &str) -> Result<Self> {
        match kind {
            StrategyType::Age => parse_age_limit(limit).map(Threshold::Age),
            StrategyType::Size => parse_size_limit(limit).map(Threshold::Size),
        }
    }

    pub fn from_config(config: &StrategyConfig) -> Result<Self> {
        Threshold::parse(config.kind, &config.limit)
    }

    /// Build the predicate for one rule execution, with "now" fixed at `now`
    pub fn matcher(self, now: SystemTime) -> impl Fn(&FileEntry) -> bool {
        let deadline = match self {
            Threshold::Age(limit) => deadline(now, limit),
            Threshold::Size(_) => None,
        };
        move |file: &FileEntry| match self {
            Threshold::Age(_) => is_past_deadline(file, deadline),
            Threshold::Size(limit) => exceeds_size(file, limit),
        }
    }
}
