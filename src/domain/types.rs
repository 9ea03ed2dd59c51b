//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during merging
//! - exported to CSV
//! - rendered by both the CLI report and the TUI chart

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A historical demand reading as fetched from the observed endpoint.
///
/// `timestamp` is kept in its source representation; normalization to
/// epoch-ms happens in `series::normalize` and a sample whose timestamp does
/// not normalize is dropped rather than failing the merge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservedSample {
    pub timestamp: String,
    pub value: Option<f64>,
}

/// A model-produced demand prediction for a specific target instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastSample {
    /// When the prediction run executed. Informational only; never merged on.
    pub run_timestamp: String,
    /// The instant being predicted. This is the merge key.
    pub target_timestamp: String,
    pub value: Option<f64>,
    pub model_version: Option<String>,
}

/// One merged chart point: a timestamp plus optional observed and forecast
/// values. The merged output contains exactly one point per distinct
/// normalized timestamp, sorted ascending with no duplicate keys.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CombinedPoint {
    pub timestamp_ms: i64,
    pub observed: Option<f64>,
    pub forecast: Option<f64>,
}

/// An inclusive calendar-day filter window.
///
/// Invariant: `end >= start` once constructed through [`DateRange::new`] or
/// [`DateRange::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Build a range, rejecting inverted windows.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, crate::error::AppError> {
        if end < start {
            return Err(crate::error::AppError::validation(format!(
                "End date {end} is before start date {start}."
            )));
        }
        Ok(Self { start, end })
    }

    /// Parse a `YYYY-MM-DD` pair and validate ordering.
    pub fn parse(start: &str, end: &str) -> Result<Self, crate::error::AppError> {
        let start = parse_day(start)?;
        let end = parse_day(end)?;
        Self::new(start, end)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }
}

fn parse_day(raw: &str) -> Result<NaiveDate, crate::error::AppError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|e| crate::error::AppError::validation(format!("Invalid date '{raw}': {e}")))
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults) or from the TUI inputs.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// The applied filter window; also clamps the chart x-axis.
    pub range: DateRange,
    /// Maximum number of forecast rows requested upstream.
    pub forecast_limit: usize,
    /// Generate synthetic data locally instead of hitting the API.
    pub offline: bool,
    /// Seed for the offline generator.
    pub sample_seed: u64,
    /// Optional CSV export of the merged series.
    pub export: Option<PathBuf>,
}

/// Per-cycle merge diagnostics (dropped samples are logged, not surfaced).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub observed_in: usize,
    pub forecast_in: usize,
    pub observed_dropped: usize,
    pub forecast_dropped: usize,
    pub points_out: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_range_accepts_single_day() {
        let range = DateRange::parse("2025-01-01", "2025-01-01").unwrap();
        assert_eq!(range.start(), range.end());
    }

    #[test]
    fn date_range_rejects_inverted_window() {
        assert!(DateRange::parse("2025-02-01", "2025-01-01").is_err());
    }

    #[test]
    fn date_range_rejects_garbage() {
        assert!(DateRange::parse("not-a-date", "2025-01-01").is_err());
        assert!(DateRange::parse("2025-01-01", "01/02/2025").is_err());
    }
}
