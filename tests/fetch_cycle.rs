//! End-to-end fetch-and-merge cycle against a mocked demand API.

use httpmock::prelude::*;
use serde_json::json;

use kwh_dash::app::pipeline::run_cycle;
use kwh_dash::data::DemandClient;
use kwh_dash::domain::{DateRange, FetchConfig};

fn config(range: DateRange) -> FetchConfig {
    FetchConfig {
        range,
        forecast_limit: 500,
        offline: false,
        sample_seed: 0,
        export: None,
    }
}

#[test]
fn merges_observed_and_forecast_from_the_api() {
    let server = MockServer::start();

    let observed_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/v1/demand/observed")
            .query_param("start_date", "2025-01-01")
            .query_param("end_date", "2025-01-02");
        then.status(200).json_body(json!([
            { "datetime": "2025-01-01T00:00:00Z", "value": 100.0 },
            { "datetime": "not a datetime", "value": 55.0 },
            { "datetime": "2025-01-01T01:00:00Z", "value": null }
        ]));
    });

    let forecast_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/v1/demand/forecast")
            .query_param("start_date", "2025-01-01")
            .query_param("end_date", "2025-01-02")
            .query_param("limit", "500");
        then.status(200).json_body(json!([
            {
                "runTimestamp": "2024-12-31T18:00:00Z",
                "targetDatetime": "2025-01-01T00:00:00Z",
                "value": 110.0,
                "modelVersion": "v3"
            },
            {
                "runTimestamp": "2024-12-31T18:00:00Z",
                "targetDatetime": "2025-01-02T00:00:00Z",
                "value": 120.0,
                "modelVersion": "v3"
            }
        ]));
    });

    let client = DemandClient::new(format!("{}/api/v1", server.base_url()));
    let range = DateRange::parse("2025-01-01", "2025-01-02").unwrap();
    let out = run_cycle(&client, &config(range)).unwrap();

    observed_mock.assert();
    forecast_mock.assert();

    // One point per distinct timestamp; the malformed and null rows dropped.
    assert_eq!(out.points.len(), 2);
    assert_eq!(out.points[0].observed, Some(100.0));
    assert_eq!(out.points[0].forecast, Some(110.0));
    assert_eq!(out.points[1].observed, None);
    assert_eq!(out.points[1].forecast, Some(120.0));
    assert!(out.points[0].timestamp_ms < out.points[1].timestamp_ms);

    assert_eq!(out.stats.observed_dropped, 2);
    assert_eq!(out.stats.forecast_dropped, 0);

    // Axis clamp matches the requested window, not the data extent.
    assert_eq!(out.display.x_bounds[0], out.bounds.min_ms as f64);
    assert_eq!(out.display.x_bounds[1], out.bounds.max_ms as f64);
}

#[test]
fn either_fetch_failing_fails_the_whole_cycle() {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path("/api/v1/demand/observed");
        then.status(200).json_body(json!([]));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/v1/demand/forecast");
        then.status(500).body("boom");
    });

    let client = DemandClient::new(format!("{}/api/v1", server.base_url()));
    let range = DateRange::parse("2025-01-01", "2025-01-02").unwrap();

    let err = run_cycle(&client, &config(range)).unwrap_err();
    assert_eq!(err.exit_code(), 4);
}

#[test]
fn malformed_top_level_shape_fails_the_cycle() {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path("/api/v1/demand/observed");
        then.status(200).json_body(json!({ "unexpected": "object" }));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/v1/demand/forecast");
        then.status(200).json_body(json!([]));
    });

    let client = DemandClient::new(format!("{}/api/v1", server.base_url()));
    let range = DateRange::parse("2025-01-01", "2025-01-02").unwrap();

    assert!(run_cycle(&client, &config(range)).is_err());
}
