//! Synthetic demand generation for offline/demo runs.
//!
//! The shape mimics a national hourly load curve: a daily sinusoid with an
//! evening peak, plus Gaussian noise. Observed readings cover the past part
//! of the window; forecasts overlap the tail of the observed span and extend
//! to the end of the window, with their own noise so the two lines visibly
//! diverge.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{DateRange, ForecastSample, ObservedSample};
use crate::error::AppError;
use crate::series::range::resolve_bounds;

/// Mean hourly demand (kWh).
const BASE_KWH: f64 = 650_000.0;
/// Peak-to-mean swing of the daily cycle (kWh).
const DAILY_SWING_KWH: f64 = 180_000.0;
/// Observation noise std dev (kWh).
const NOISE_KWH: f64 = 15_000.0;
/// Forecast error std dev (kWh); larger than observation noise.
const FORECAST_NOISE_KWH: f64 = 30_000.0;
/// Every Nth sample is emitted with a null value to exercise gap handling.
const NULL_EVERY: usize = 48;

/// Generate one observed and one forecast collection for the window.
///
/// Observed readings span the first ~70% of the window; forecasts start at
/// ~60% so the two series overlap, matching the shape of live data where the
/// latest prediction run covers recent history plus the future.
pub fn generate_sample(
    range: &DateRange,
    seed: u64,
) -> Result<(Vec<ObservedSample>, Vec<ForecastSample>), AppError> {
    let bounds = resolve_bounds(range);
    let hours = ((bounds.max_ms - bounds.min_ms) / 3_600_000).max(1) as usize;

    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, NOISE_KWH)
        .map_err(|e| AppError::upstream(format!("Noise distribution error: {e}")))?;
    let forecast_noise = Normal::new(0.0, FORECAST_NOISE_KWH)
        .map_err(|e| AppError::upstream(format!("Noise distribution error: {e}")))?;

    let start = DateTime::<Utc>::from_timestamp_millis(bounds.min_ms)
        .ok_or_else(|| AppError::validation("Filter window is out of datetime range."))?;

    let observed_end = hours * 7 / 10;
    let forecast_start = hours * 6 / 10;

    let run_ts = fmt_instant(start + Duration::hours(forecast_start as i64));

    let mut observed = Vec::with_capacity(observed_end);
    let mut forecast = Vec::with_capacity(hours - forecast_start);

    for h in 0..hours {
        let instant = start + Duration::hours(h as i64);
        let level = underlying_kwh(&instant);

        if h < observed_end {
            let value = if h % NULL_EVERY == NULL_EVERY - 1 {
                None
            } else {
                Some((level + noise.sample(&mut rng)).max(0.0))
            };
            observed.push(ObservedSample {
                timestamp: fmt_instant(instant),
                value,
            });
        }

        if h >= forecast_start {
            forecast.push(ForecastSample {
                run_timestamp: run_ts.clone(),
                target_timestamp: fmt_instant(instant),
                value: Some((level + forecast_noise.sample(&mut rng)).max(0.0)),
                model_version: Some("demo-v1".to_string()),
            });
        }
    }

    Ok((observed, forecast))
}

fn underlying_kwh(instant: &DateTime<Utc>) -> f64 {
    use chrono::Timelike;
    // Peak around 19:00, trough around 04:00.
    let hour = instant.hour() as f64;
    let phase = (hour - 13.0) / 24.0 * std::f64::consts::TAU;
    BASE_KWH + DAILY_SWING_KWH * phase.sin()
}

fn fmt_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::merge::merge;

    #[test]
    fn generation_is_deterministic_for_a_seed() {
        let range = DateRange::parse("2025-01-01", "2025-01-07").unwrap();
        let (obs_a, fc_a) = generate_sample(&range, 42).unwrap();
        let (obs_b, fc_b) = generate_sample(&range, 42).unwrap();

        assert_eq!(obs_a.len(), obs_b.len());
        assert_eq!(fc_a.len(), fc_b.len());
        assert_eq!(obs_a[0].value, obs_b[0].value);
        assert_eq!(fc_a[0].value, fc_b[0].value);
    }

    #[test]
    fn observed_and_forecast_overlap() {
        let range = DateRange::parse("2025-01-01", "2025-01-10").unwrap();
        let (observed, forecast) = generate_sample(&range, 7).unwrap();

        let (points, _) = merge(&observed, &forecast);
        let overlapping = points
            .iter()
            .filter(|p| p.observed.is_some() && p.forecast.is_some())
            .count();
        assert!(overlapping > 0, "expected an overlap window");
    }

    #[test]
    fn sample_timestamps_all_normalize() {
        let range = DateRange::parse("2025-01-01", "2025-01-02").unwrap();
        let (observed, forecast) = generate_sample(&range, 1).unwrap();
        for s in &observed {
            assert!(crate::series::normalize::to_epoch_ms(&s.timestamp).is_some());
        }
        for s in &forecast {
            assert!(crate::series::normalize::to_epoch_ms(&s.target_timestamp).is_some());
        }
    }
}
