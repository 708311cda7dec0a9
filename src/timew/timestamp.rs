//! Timewarrior writes timestamps in the compact form `20250228T063000Z`. These are rewritten to
//! `2025-02-28T06:30:00Z` by position and then parsed as RFC 3339.

use crate::error::{ErrorType, IntoResult, Res};
use crate::Result;
use anyhow::{bail, Context};
use chrono::{DateTime, Utc};

const COMPACT_LEN: usize = 16;

/// Rewrites a compact `YYYYMMDDTHHMMSSZ` timestamp into the extended ISO 8601 form
/// `YYYY-MM-DDTHH:MM:SSZ`.
///
/// # Example
/// ```
/// # use timew_moco::timew::normalize_timestamp;
/// let iso = normalize_timestamp("20250228T063000Z").unwrap();
/// assert_eq!(iso, "2025-02-28T06:30:00Z");
/// ```
///
/// # Errors
/// - Returns an `ErrorType::Validation` error if `compact` does not have that shape.
pub fn normalize_timestamp(compact: &str) -> Result<String> {
    to_rfc3339(compact).pub_result(ErrorType::Validation)
}

/// Normalizes and parses a compact Timewarrior timestamp into a UTC instant.
///
/// # Errors
/// - Returns an `ErrorType::Validation` error if `compact` is malformed or not a real instant.
pub fn parse_timestamp(compact: &str) -> Result<DateTime<Utc>> {
    parse_compact(compact).pub_result(ErrorType::Validation)
}

fn to_rfc3339(compact: &str) -> Res<String> {
    let b = compact.as_bytes();
    if b.len() != COMPACT_LEN || !compact.is_ascii() || b[8] != b'T' || b[15] != b'Z' {
        bail!("'{compact}' is not a timestamp of the form YYYYMMDDTHHMMSSZ");
    }
    Ok(format!(
        "{}-{}-{}T{}:{}:{}Z",
        &compact[0..4],
        &compact[4..6],
        &compact[6..8],
        &compact[9..11],
        &compact[11..13],
        &compact[13..15],
    ))
}

pub(crate) fn parse_compact(compact: &str) -> Res<DateTime<Utc>> {
    let iso = to_rfc3339(compact)?;
    let parsed = DateTime::parse_from_rfc3339(&iso)
        .with_context(|| format!("Unable to parse timestamp '{compact}'"))?;
    Ok(parsed.with_timezone(&Utc))
}
