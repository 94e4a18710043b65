//! Age limits: parsing and matching.

use crate::error::{Result, ScrubError};
use crate::fs::FileEntry;
use std::time::{Duration, SystemTime};

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;

/// Seconds per unit letter. Units are case-sensitive: "m" is minutes, not months.
fn unit_seconds(unit: char) -> Option<u64> {
    match unit {
        'm' => Some(MINUTE),
        'h' => Some(HOUR),
        'd' => Some(24 * HOUR),
        'w' => Some(7 * 24 * HOUR),
        'y' => Some(8760 * HOUR),
        _ => None,
    }
}

/// Parse an age limit such as "7d" or "1w 2d 1h 15m".
///
/// The limit is a whitespace-separated list of `<n><unit>` tokens whose durations are
/// added up. Supported units: m (minutes), h (hours), d (days), w (weeks), y (365 days).
pub fn parse_age_limit(limit: &str) -> Result<Duration> {
    if limit.trim().is_empty() {
        return Err(ScrubError::age_limit(limit, "limit cannot be empty"));
    }

    let mut total: u64 = 0;

    for part in limit.split_whitespace() {
        // Split off the unit, which is always the last character
        let Some(unit) = part.chars().last() else {
            continue;
        };
        let quantifier = &part[..part.len() - unit.len_utf8()];

        let value: u64 = quantifier.parse().map_err(|_| {
            ScrubError::age_limit(
                limit,
                format!("invalid quantifier {:?} in {:?}", quantifier, part),
            )
        })?;

        let seconds = unit_seconds(unit).ok_or_else(|| {
            ScrubError::age_limit(
                limit,
                format!("unknown unit '{}'. Supported units: m, h, d, w, y", unit),
            )
        })?;

        total = value
            .checked_mul(seconds)
            .and_then(|s| total.checked_add(s))
            .ok_or_else(|| ScrubError::age_limit(limit, "limit is too large"))?;
    }

    Ok(Duration::from_secs(total))
}

/// Files modified before this point in time are past the age limit
pub fn deadline(now: SystemTime, limit: Duration) -> Option<SystemTime> {
    now.checked_sub(limit)
}

/// True if the file was modified strictly before the deadline.
///
/// With no representable deadline nothing is old enough.
pub fn is_past_deadline(file: &FileEntry, deadline: Option<SystemTime>) -> bool {
    match deadline {
        Some(deadline) => file.modified < deadline,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::EntryKind;

    fn h(hours: u64) -> u64 {
        hours * HOUR
    }

    // ============ parse_age_limit tests ============

    #[test]
    fn test_parse_age_single_units() {
        assert_eq!(parse_age_limit("15m").unwrap().as_secs(), 15 * MINUTE);
        assert_eq!(parse_age_limit("1h").unwrap().as_secs(), h(1));
        assert_eq!(parse_age_limit("1d").unwrap().as_secs(), h(24));
        assert_eq!(parse_age_limit("1w").unwrap().as_secs(), h(168));
        assert_eq!(parse_age_limit("1y").unwrap().as_secs(), h(8760));
        assert_eq!(parse_age_limit("2y").unwrap().as_secs(), h(2 * 8760));
    }

    #[test]
    fn test_parse_age_combined() {
        assert_eq!(
            parse_age_limit("1h 15m").unwrap(),
            Duration::from_secs(75 * MINUTE)
        );
        assert_eq!(
            parse_age_limit("1d 1h 15m").unwrap().as_secs(),
            h(25) + 15 * MINUTE
        );
        assert_eq!(
            parse_age_limit("1w 2d 1h 15m").unwrap().as_secs(),
            h(217) + 15 * MINUTE
        );
        assert_eq!(parse_age_limit("1y 1w 2d 1h 0m").unwrap().as_secs(), h(8977));
    }

    #[test]
    fn test_parse_age_extra_whitespace() {
        assert_eq!(
            parse_age_limit("  1h\t 15m ").unwrap().as_secs(),
            h(1) + 15 * MINUTE
        );
    }

    #[test]
    fn test_parse_age_zero() {
        assert_eq!(parse_age_limit("0d").unwrap().as_secs(), 0);
    }

    #[test]
    fn test_parse_age_empty() {
        let err = parse_age_limit("").unwrap_err();
        assert!(err.to_string().contains("cannot be empty"));
        assert!(parse_age_limit("   ").is_err());
    }

    #[test]
    fn test_parse_age_negative() {
        let err = parse_age_limit("-15m").unwrap_err();
        assert!(err.to_string().contains("invalid quantifier"));
    }

    #[test]
    fn test_parse_age_unknown_unit() {
        let err = parse_age_limit("2x").unwrap_err();
        assert!(err.to_string().contains("unknown unit 'x'"));
        // Units are case-sensitive
        assert!(parse_age_limit("2D").is_err());
    }

    #[test]
    fn test_parse_age_garbage() {
        assert!(parse_age_limit("/").is_err());
        assert!(parse_age_limit("d").is_err());
        assert!(parse_age_limit("1h x").is_err());
        assert!(parse_age_limit("1.5h").is_err());
    }

    #[test]
    fn test_parse_age_overflow() {
        let err = parse_age_limit("99999999999999999y").unwrap_err();
        assert!(err.to_string().contains("too large"));
    }

    // ============ deadline tests ============

    fn modified_at(time: SystemTime) -> FileEntry {
        FileEntry::new("app.log", 1, time, EntryKind::File)
    }

    #[test]
    fn test_deadline_is_strict() {
        let now = SystemTime::now();
        let limit = Duration::from_secs(h(24));
        let deadline = deadline(now, limit);

        assert!(is_past_deadline(&modified_at(now - limit - Duration::from_secs(1)), deadline));
        assert!(!is_past_deadline(&modified_at(now - limit), deadline));
        assert!(!is_past_deadline(&modified_at(now), deadline));
    }

    #[test]
    fn test_unrepresentable_deadline_matches_nothing() {
        let deadline = deadline(SystemTime::now(), Duration::from_secs(u64::MAX));
        assert!(deadline.is_none());
        assert!(!is_past_deadline(&modified_at(SystemTime::UNIX_EPOCH), deadline));
    }
}
