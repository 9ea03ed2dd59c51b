//! Renderer-agnostic display configuration.
//!
//! The assembler packages the merged series plus formatting rules for the
//! chart widget and holds no algorithmic logic of its own: bounds come from
//! `series::range`, labels from `series::format`, points from `series::merge`.

use crate::domain::CombinedPoint;
use crate::series::format::{format_day, format_instant, format_magnitude};
use crate::series::range::{MS_PER_DAY, RangeBounds};

/// Maximum on-screen x ticks before labels start crowding.
pub const MAX_X_TICKS: usize = 15;

/// One named value series keyed by the shared timestamp sequence.
///
/// Gaps are encoded as `f64::NAN`, never zero. `span_gaps` tells the renderer
/// to keep line continuity across missing samples of this series.
#[derive(Debug, Clone)]
pub struct SeriesDef {
    pub label: &'static str,
    pub points: Vec<(f64, f64)>,
    pub span_gaps: bool,
}

impl SeriesDef {
    /// The present (finite) samples of this series, in axis order.
    pub fn present_points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.points.iter().copied().filter(|&(_, y)| y.is_finite())
    }
}

/// Everything the renderer needs: two parallel series, axis bounds, tick
/// budget, and label callbacks.
#[derive(Debug, Clone)]
pub struct DisplayConfig {
    pub observed: SeriesDef,
    pub forecast: SeriesDef,
    /// X clamp in epoch-ms, straight from the resolved filter bounds.
    pub x_bounds: [f64; 2],
    /// Y range; always begins at zero.
    pub y_bounds: [f64; 2],
    pub max_x_ticks: usize,
    pub fmt_x: fn(f64) -> String,
    pub fmt_y: fn(f64) -> String,
}

/// Assemble the display configuration for a merged series.
pub fn build_display_config(points: &[CombinedPoint], bounds: RangeBounds) -> DisplayConfig {
    let observed: Vec<(f64, f64)> = points
        .iter()
        .map(|p| (p.timestamp_ms as f64, p.observed.unwrap_or(f64::NAN)))
        .collect();
    let forecast: Vec<(f64, f64)> = points
        .iter()
        .map(|p| (p.timestamp_ms as f64, p.forecast.unwrap_or(f64::NAN)))
        .collect();

    let mut y_max = f64::NEG_INFINITY;
    for &(_, y) in observed.iter().chain(forecast.iter()) {
        if y.is_finite() {
            y_max = y_max.max(y);
        }
    }
    if !y_max.is_finite() || y_max <= 0.0 {
        y_max = 1.0;
    }

    // Hour-level labels only make sense on narrow windows.
    let fmt_x = if bounds.max_ms - bounds.min_ms <= 3 * MS_PER_DAY {
        format_instant as fn(f64) -> String
    } else {
        format_day as fn(f64) -> String
    };

    DisplayConfig {
        observed: SeriesDef {
            label: "observed (kWh)",
            points: observed,
            span_gaps: true,
        },
        forecast: SeriesDef {
            label: "forecast (kWh)",
            points: forecast,
            span_gaps: true,
        },
        x_bounds: [bounds.min_ms as f64, bounds.max_ms as f64],
        y_bounds: [0.0, y_max * 1.05],
        max_x_ticks: MAX_X_TICKS,
        fmt_x,
        fmt_y: format_magnitude,
    }
}
