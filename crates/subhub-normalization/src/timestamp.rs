//! Timestamp parsing for `createdAt` resolution.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;
use subhub_common::value_to_i64;

/// Naive date-time layouts, interpreted as UTC.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse a calendar date-time string into epoch seconds.
///
/// Tries RFC 3339 first, then naive date-times (UTC), then a bare
/// `YYYY-MM-DD` date at midnight UTC.
///
/// # Examples
///
/// ```
/// use subhub_normalization::timestamp::parse_timestamp;
///
/// assert_eq!(parse_timestamp("2024-01-15T10:30:00Z"), Some(1_705_314_600));
/// assert_eq!(parse_timestamp("2024-01-15"), Some(1_705_276_800));
/// assert_eq!(parse_timestamp("yesterday"), None);
/// ```
pub fn parse_timestamp(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.timestamp());
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(naive.and_utc().timestamp());
        }
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().timestamp())
}

/// Read a timestamp value as epoch seconds.
///
/// Numbers and numeric strings are taken verbatim as epoch seconds (floats
/// truncate); other strings go through [`parse_timestamp`].
pub fn timestamp_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(_) => value_to_i64(value),
        Value::String(s) => value_to_i64(value).or_else(|| parse_timestamp(s)),
        _ => None,
    }
}

/// Read a calendar date-time value as epoch seconds.
///
/// Only strings are accepted, and numeric strings are not epoch seconds here.
pub fn calendar_timestamp_from_value(value: &Value) -> Option<i64> {
    value.as_str().and_then(parse_timestamp)
}
