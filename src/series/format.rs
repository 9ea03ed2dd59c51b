//! Tick and tooltip label formatting.

use chrono::DateTime;

/// Fixed placeholder returned for any timestamp that cannot be formatted.
pub const INVALID_INSTANT_LABEL: &str = "invalid date";

/// Short date+time label for an epoch-ms timestamp, e.g. `14:30 18 Apr`.
///
/// Takes `f64` because chart axis callbacks hand back floating-point
/// coordinates. Non-finite input, or a value outside the representable
/// datetime range, yields [`INVALID_INSTANT_LABEL`] — the check is explicit
/// because a non-finite cast would otherwise silently saturate into a bogus
/// but formattable instant.
pub fn format_instant(timestamp_ms: f64) -> String {
    if !timestamp_ms.is_finite() {
        return INVALID_INSTANT_LABEL.to_string();
    }
    match DateTime::from_timestamp_millis(timestamp_ms as i64) {
        Some(dt) => dt.format("%H:%M %d %b").to_string(),
        None => INVALID_INSTANT_LABEL.to_string(),
    }
}

/// Compact day label for axis ticks on wide windows, e.g. `18 Apr`.
pub fn format_day(timestamp_ms: f64) -> String {
    if !timestamp_ms.is_finite() {
        return INVALID_INSTANT_LABEL.to_string();
    }
    match DateTime::from_timestamp_millis(timestamp_ms as i64) {
        Some(dt) => dt.format("%d %b").to_string(),
        None => INVALID_INSTANT_LABEL.to_string(),
    }
}

/// Magnitude-abbreviated value label: one-decimal `M` at >= 1e6, zero-decimal
/// `k` at >= 1e3, the plain number below. Non-finite input yields the empty
/// string.
pub fn format_magnitude(value: f64) -> String {
    if !value.is_finite() {
        return String::new();
    }
    if value >= 1_000_000.0 {
        format!("{:.1} M", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("{:.0}k", value / 1_000.0)
    } else {
        format!("{value}")
    }
}
