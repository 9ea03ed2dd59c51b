//! Timestamp normalization: heterogeneous date-time strings to epoch-ms.

use chrono::{DateTime, NaiveDateTime};

/// Accepted naive layouts, tried in order after RFC 3339.
///
/// The upstream API serializes naive UTC datetimes without an offset, both
/// with and without fractional seconds, and occasionally with a space
/// separator instead of `T`.
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
];

/// Parse a date-time string into epoch milliseconds (UTC).
///
/// Returns `None` when the string does not parse to a valid instant. Callers
/// must treat `None` as "drop this sample" so that malformed upstream records
/// degrade gracefully instead of aborting the whole merge.
pub fn to_epoch_ms(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.timestamp_millis());
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(naive.and_utc().timestamp_millis());
        }
    }

    None
}
