//! Size limits: parsing and matching.
//!
//! All multipliers are binary, so "1KB" and "1KiB" are both 1024 bytes and "10MB" is
//! 10 * 1024 * 1024 bytes.

use crate::error::{Result, ScrubError};
use crate::fs::FileEntry;

const KIB: u64 = 1024;

fn unit_multiplier(unit: &str) -> Option<u64> {
    let multiplier = match unit {
        "" | "b" | "byte" | "bytes" => 1,
        "k" | "kb" | "kib" => KIB,
        "m" | "mb" | "mib" => KIB.pow(2),
        "g" | "gb" | "gib" => KIB.pow(3),
        "t" | "tb" | "tib" => KIB.pow(4),
        "p" | "pb" | "pib" => KIB.pow(5),
        "e" | "eb" | "eib" => KIB.pow(6),
        _ => return None,
    };
    Some(multiplier)
}

/// Parse a size limit such as "10b", "512K" or "10MB" into a byte count.
///
/// The quantity must be a whole number and the result must be greater than zero.
pub fn parse_size_limit(limit: &str) -> Result<u64> {
    let trimmed = limit.trim();
    if trimmed.is_empty() {
        return Err(ScrubError::size_limit(limit, "limit cannot be empty"));
    }

    let (number, unit) = match trimmed.find(|c: char| !c.is_ascii_digit()) {
        Some(pos) => trimmed.split_at(pos),
        None => (trimmed, ""),
    };

    if number.is_empty() {
        return Err(ScrubError::size_limit(
            limit,
            "expected a whole number followed by an optional unit",
        ));
    }

    let value: u64 = number
        .parse()
        .map_err(|_| ScrubError::size_limit(limit, "number is too large"))?;

    let unit = unit.trim().to_ascii_lowercase();
    let multiplier = unit_multiplier(&unit).ok_or_else(|| {
        ScrubError::size_limit(
            limit,
            format!("unknown unit {:?}. Use B, K/KB, M/MB, G/GB, T/TB, P/PB or E/EB", unit),
        )
    })?;

    let bytes = value
        .checked_mul(multiplier)
        .ok_or_else(|| ScrubError::size_limit(limit, "limit is too large"))?;

    if bytes == 0 {
        return Err(ScrubError::size_limit(
            limit,
            "file size limit has to be greater than 0",
        ));
    }

    Ok(bytes)
}

/// True if the file is strictly larger than the limit
pub fn exceeds_size(file: &FileEntry, limit: u64) -> bool {
    file.size > limit
}
