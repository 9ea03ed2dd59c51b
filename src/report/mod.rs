//! Formatted terminal output for the non-interactive `fetch` command.
//!
//! We keep formatting code in one place so output changes stay localized and
//! the merge core stays clean and testable.

use crate::app::pipeline::CycleOutput;
use crate::domain::FetchConfig;
use crate::series::format::{format_instant, format_magnitude};

/// Format the cycle summary: window, counts, and per-series extents.
pub fn format_cycle_summary(out: &CycleOutput, config: &FetchConfig) -> String {
    let mut text = String::new();

    text.push_str("=== kwh - demand vs. forecast ===\n");
    text.push_str(&format!(
        "Window: {} .. {} (inclusive)\n",
        config.range.start(),
        config.range.end()
    ));
    text.push_str(&format!(
        "Rows: observed={} forecast={} | dropped: observed={} forecast={}\n",
        out.stats.observed_in,
        out.stats.forecast_in,
        out.stats.observed_dropped,
        out.stats.forecast_dropped,
    ));

    if out.points.is_empty() {
        text.push_str("No demand data for the selected range.\n");
        return text;
    }

    let first = out.points.first().map(|p| p.timestamp_ms).unwrap_or_default();
    let last = out.points.last().map(|p| p.timestamp_ms).unwrap_or_default();
    text.push_str(&format!(
        "Points: n={} | {} .. {}\n",
        out.points.len(),
        format_instant(first as f64),
        format_instant(last as f64),
    ));

    if let Some((min, max)) = series_extent(out.points.iter().filter_map(|p| p.observed)) {
        text.push_str(&format!(
            "Observed: {} .. {} kWh\n",
            format_magnitude(min),
            format_magnitude(max)
        ));
    }
    if let Some((min, max)) = series_extent(out.points.iter().filter_map(|p| p.forecast)) {
        text.push_str(&format!(
            "Forecast: {} .. {} kWh\n",
            format_magnitude(min),
            format_magnitude(max)
        ));
    }

    let both = out
        .points
        .iter()
        .filter(|p| p.observed.is_some() && p.forecast.is_some())
        .count();
    text.push_str(&format!("Overlap: {both} points carry both values\n"));

    text
}

fn series_extent(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let mut extent: Option<(f64, f64)> = None;
    for v in values {
        extent = Some(match extent {
            None => (v, v),
            Some((min, max)) => (min.min(v), max.max(v)),
        });
    }
    extent
}
