//! REST client for the demand API (observed readings + model forecasts).

use reqwest::blocking::Client;
use serde::Deserialize;

use crate::domain::{DateRange, ForecastSample, ObservedSample};
use crate::error::AppError;

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api/v1";

/// Blocking HTTP client for the two demand endpoints.
///
/// Both endpoints take the applied filter window as inclusive day-level
/// `start_date`/`end_date` parameters, so the fetched window always matches
/// the displayed axis range.
#[derive(Clone)]
pub struct DemandClient {
    client: Client,
    base_url: String,
}

impl DemandClient {
    /// Build a client from the environment (`KWH_API_URL`, via `.env` if
    /// present), falling back to the local development server.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let base_url = std::env::var("KWH_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }

    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            client: Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch historical readings for the filter window.
    pub fn fetch_observed(&self, range: &DateRange) -> Result<Vec<ObservedSample>, AppError> {
        let url = format!("{}/demand/observed", self.base_url);
        let rows: Vec<ObservedRow> = self.get_json(
            &url,
            &[
                ("start_date", range.start().to_string()),
                ("end_date", range.end().to_string()),
            ],
        )?;

        Ok(rows
            .into_iter()
            .map(|row| ObservedSample {
                timestamp: row.datetime,
                value: row.value,
            })
            .collect())
    }

    /// Fetch model forecasts for the filter window.
    pub fn fetch_forecast(&self, range: &DateRange, limit: usize) -> Result<Vec<ForecastSample>, AppError> {
        let url = format!("{}/demand/forecast", self.base_url);
        let rows: Vec<ForecastRow> = self.get_json(
            &url,
            &[
                ("start_date", range.start().to_string()),
                ("end_date", range.end().to_string()),
                ("limit", limit.to_string()),
            ],
        )?;

        Ok(rows
            .into_iter()
            .map(|row| ForecastSample {
                run_timestamp: row.run_timestamp,
                target_timestamp: row.target_datetime,
                value: row.value,
                model_version: row.model_version,
            })
            .collect())
    }

    fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, AppError> {
        tracing::debug!(url, "requesting demand data");

        let resp = self
            .client
            .get(url)
            .query(query)
            .send()
            .map_err(|e| AppError::upstream(format!("Demand API request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AppError::upstream(format!(
                "Demand API request failed with status {status} ({url})."
            )));
        }

        resp.json()
            .map_err(|e| AppError::upstream(format!("Failed to parse demand API response: {e}")))
    }
}

#[derive(Debug, Deserialize)]
struct ObservedRow {
    datetime: String,
    value: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ForecastRow {
    #[serde(default)]
    run_timestamp: String,
    target_datetime: String,
    value: Option<f64>,
    #[serde(default)]
    model_version: Option<String>,
}
