//! Date-range bounds: the filter window in epoch-ms.

use crate::domain::DateRange;

pub const MS_PER_DAY: i64 = 86_400_000;

/// Inclusive epoch-ms bounds of a filter window (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeBounds {
    /// Midnight (00:00:00.000) of the start day.
    pub min_ms: i64,
    /// The final millisecond (23:59:59.999) of the end day.
    pub max_ms: i64,
}

/// Compute the bounding timestamps of an accepted range.
///
/// The same bounds parameterize the upstream fetch (as inclusive day-level
/// request parameters) and clamp the chart x-axis, so the fetched window and
/// the displayed window never diverge.
pub fn resolve_bounds(range: &DateRange) -> RangeBounds {
    let min_ms = midnight_ms(range.start());
    let max_ms = midnight_ms(range.end()) + MS_PER_DAY - 1;
    RangeBounds { min_ms, max_ms }
}

fn midnight_ms(day: chrono::NaiveDate) -> i64 {
    day.and_time(chrono::NaiveTime::MIN).and_utc().timestamp_millis()
}
