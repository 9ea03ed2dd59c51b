//! Shared fetch-and-merge pipeline used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! resolve bounds -> fetch observed + forecast -> merge -> display config
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use crate::data::{DemandClient, generate_sample};
use crate::domain::{CombinedPoint, FetchConfig, MergeStats};
use crate::error::AppError;
use crate::series::display::{DisplayConfig, build_display_config};
use crate::series::merge::merge;
use crate::series::range::{RangeBounds, resolve_bounds};

/// All computed outputs of a single fetch-and-merge cycle.
#[derive(Debug, Clone)]
pub struct CycleOutput {
    pub points: Vec<CombinedPoint>,
    pub stats: MergeStats,
    pub bounds: RangeBounds,
    pub display: DisplayConfig,
}

/// Execute one full cycle for an already-validated filter window.
///
/// The two upstream fetches run concurrently; if either fails the whole
/// cycle fails and no partial merge is produced.
pub fn run_cycle(client: &DemandClient, config: &FetchConfig) -> Result<CycleOutput, AppError> {
    let bounds = resolve_bounds(&config.range);

    let (observed, forecast) = if config.offline {
        generate_sample(&config.range, config.sample_seed)?
    } else {
        let (observed, forecast) = rayon::join(
            || client.fetch_observed(&config.range),
            || client.fetch_forecast(&config.range, config.forecast_limit),
        );
        (observed?, forecast?)
    };

    tracing::debug!(
        observed = observed.len(),
        forecast = forecast.len(),
        "fetched demand collections"
    );

    let (points, stats) = merge(&observed, &forecast);
    let display = build_display_config(&points, bounds);

    Ok(CycleOutput {
        points,
        stats,
        bounds,
        display,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DateRange;

    fn offline_config(start: &str, end: &str) -> FetchConfig {
        FetchConfig {
            range: DateRange::parse(start, end).unwrap(),
            forecast_limit: 500,
            offline: true,
            sample_seed: 42,
            export: None,
        }
    }

    #[test]
    fn offline_cycle_produces_sorted_points_within_bounds() {
        let client = DemandClient::new("http://unused.invalid");
        let config = offline_config("2025-01-01", "2025-01-05");

        let out = run_cycle(&client, &config).unwrap();

        assert!(!out.points.is_empty());
        for pair in out.points.windows(2) {
            assert!(pair[0].timestamp_ms < pair[1].timestamp_ms);
        }
        for p in &out.points {
            assert!(p.timestamp_ms >= out.bounds.min_ms);
            assert!(p.timestamp_ms <= out.bounds.max_ms);
        }
        assert_eq!(out.display.observed.points.len(), out.points.len());
        assert_eq!(out.stats.points_out, out.points.len());
    }
}
