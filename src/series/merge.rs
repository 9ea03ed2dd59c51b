//! Merge observed and forecast samples onto a common timestamp axis.

use std::collections::HashMap;

use crate::domain::{CombinedPoint, ForecastSample, MergeStats, ObservedSample};
use crate::series::normalize::to_epoch_ms;

/// Combine two independently-sourced sample collections into one ascending
/// sequence of [`CombinedPoint`]s keyed on normalized epoch-ms.
///
/// Rules:
/// - a sample with a missing value or an unnormalizable timestamp neither
///   creates nor updates a point (it is counted in [`MergeStats`] and logged)
/// - on duplicate timestamps within a series, the later sample in iteration
///   order wins (explicit last-write-wins policy)
/// - a forecast sample landing on an existing observed timestamp sets only
///   the `forecast` field of that point
///
/// The operation is pure and deterministic: O(n + m) map work plus an
/// O(k log k) sort of the k <= n + m resulting points.
pub fn merge(observed: &[ObservedSample], forecast: &[ForecastSample]) -> (Vec<CombinedPoint>, MergeStats) {
    let mut stats = MergeStats {
        observed_in: observed.len(),
        forecast_in: forecast.len(),
        ..MergeStats::default()
    };

    let mut by_ts: HashMap<i64, CombinedPoint> = HashMap::with_capacity(observed.len() + forecast.len());

    for sample in observed {
        let Some(value) = sample.value else {
            stats.observed_dropped += 1;
            continue;
        };
        let Some(ts) = to_epoch_ms(&sample.timestamp) else {
            stats.observed_dropped += 1;
            tracing::debug!(timestamp = %sample.timestamp, "dropping observed sample with unparsable timestamp");
            continue;
        };
        by_ts
            .entry(ts)
            .and_modify(|p| p.observed = Some(value))
            .or_insert(CombinedPoint {
                timestamp_ms: ts,
                observed: Some(value),
                forecast: None,
            });
    }

    for sample in forecast {
        let Some(value) = sample.value else {
            stats.forecast_dropped += 1;
            continue;
        };
        let Some(ts) = to_epoch_ms(&sample.target_timestamp) else {
            stats.forecast_dropped += 1;
            tracing::debug!(timestamp = %sample.target_timestamp, "dropping forecast sample with unparsable timestamp");
            continue;
        };
        by_ts
            .entry(ts)
            .and_modify(|p| p.forecast = Some(value))
            .or_insert(CombinedPoint {
                timestamp_ms: ts,
                observed: None,
                forecast: Some(value),
            });
    }

    let mut points: Vec<CombinedPoint> = by_ts.into_values().collect();
    points.sort_by_key(|p| p.timestamp_ms);
    stats.points_out = points.len();

    if stats.observed_dropped + stats.forecast_dropped > 0 {
        tracing::debug!(
            observed_dropped = stats.observed_dropped,
            forecast_dropped = stats.forecast_dropped,
            "dropped samples during merge"
        );
    }

    (points, stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(ts: &str, value: Option<f64>) -> ObservedSample {
        ObservedSample {
            timestamp: ts.to_string(),
            value,
        }
    }

    fn fc(ts: &str, value: Option<f64>) -> ForecastSample {
        ForecastSample {
            run_timestamp: "2025-01-01T00:00:00Z".to_string(),
            target_timestamp: ts.to_string(),
            value,
            model_version: Some("v1".to_string()),
        }
    }

    #[test]
    fn disjoint_timestamps_produce_one_point_each() {
        let observed = vec![obs("2025-01-01T00:00:00Z", Some(100.0)), obs("2025-01-01T01:00:00Z", Some(101.0))];
        let forecast = vec![fc("2025-01-01T02:00:00Z", Some(110.0))];

        let (points, stats) = merge(&observed, &forecast);

        assert_eq!(points.len(), 3);
        assert_eq!(stats.points_out, 3);
        for p in &points {
            assert!(p.observed.is_some() ^ p.forecast.is_some());
        }
    }

    #[test]
    fn shared_timestamp_sets_both_fields_on_one_point() {
        let observed = vec![obs("2025-01-01T00:00:00Z", Some(100.0))];
        let forecast = vec![
            fc("2025-01-01T00:00:00Z", Some(110.0)),
            fc("2025-01-02T00:00:00Z", Some(120.0)),
        ];

        let (points, _) = merge(&observed, &forecast);

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].observed, Some(100.0));
        assert_eq!(points[0].forecast, Some(110.0));
        assert_eq!(points[1].observed, None);
        assert_eq!(points[1].forecast, Some(120.0));
        assert!(points[0].timestamp_ms < points[1].timestamp_ms);
    }

    #[test]
    fn output_is_strictly_ascending_regardless_of_input_order() {
        let observed = vec![
            obs("2025-01-03T00:00:00Z", Some(3.0)),
            obs("2025-01-01T00:00:00Z", Some(1.0)),
            obs("2025-01-02T00:00:00Z", Some(2.0)),
        ];
        let forecast = vec![
            fc("2025-01-05T00:00:00Z", Some(5.0)),
            fc("2025-01-04T00:00:00Z", Some(4.0)),
        ];

        let (points, _) = merge(&observed, &forecast);

        assert_eq!(points.len(), 5);
        for pair in points.windows(2) {
            assert!(pair[0].timestamp_ms < pair[1].timestamp_ms);
        }
    }

    #[test]
    fn null_valued_samples_contribute_nothing() {
        let observed = vec![obs("2025-01-01T00:00:00Z", None)];
        let (points, stats) = merge(&observed, &[]);

        assert!(points.is_empty());
        assert_eq!(stats.observed_dropped, 1);
    }

    #[test]
    fn unparsable_timestamps_are_dropped_not_fatal() {
        let observed = vec![
            obs("garbage", Some(1.0)),
            obs("2025-01-01T00:00:00Z", Some(2.0)),
        ];
        let forecast = vec![fc("also garbage", Some(3.0))];

        let (points, stats) = merge(&observed, &forecast);

        assert_eq!(points.len(), 1);
        assert_eq!(points[0].observed, Some(2.0));
        assert_eq!(stats.observed_dropped, 1);
        assert_eq!(stats.forecast_dropped, 1);
    }

    #[test]
    fn duplicate_timestamp_within_a_series_last_write_wins() {
        let observed = vec![
            obs("2025-01-01T00:00:00Z", Some(1.0)),
            obs("2025-01-01T00:00:00Z", Some(2.0)),
        ];
        let forecast = vec![
            fc("2025-01-01T00:00:00Z", Some(10.0)),
            fc("2025-01-01T00:00:00Z", Some(20.0)),
        ];

        let (points, _) = merge(&observed, &forecast);

        assert_eq!(points.len(), 1);
        assert_eq!(points[0].observed, Some(2.0));
        assert_eq!(points[0].forecast, Some(20.0));
    }

    #[test]
    fn equivalent_representations_collide_on_one_key() {
        // Same instant written with offset and as naive UTC.
        let observed = vec![obs("2025-01-01T05:00:00+05:00", Some(1.0))];
        let forecast = vec![fc("2025-01-01T00:00:00", Some(2.0))];

        let (points, _) = merge(&observed, &forecast);

        assert_eq!(points.len(), 1);
        assert_eq!(points[0].observed, Some(1.0));
        assert_eq!(points[0].forecast, Some(2.0));
    }
}
