//! FRED API integration for Treasury, mortgage, and price-index series.

use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::data::provider::SeriesProvider;
use crate::domain::{Indicator, Observation, Series, SeriesRequest};
use crate::error::ProviderError;

const BASE_URL: &str = "https://api.stlouisfed.org/fred/series/observations";
const API_KEY_VAR: &str = "FRED_API_KEY";

pub struct FredClient {
    client: Client,
    api_key: String,
}

impl FredClient {
    pub fn from_env() -> Result<Self, ProviderError> {
        dotenvy::dotenv().ok();
        let api_key = std::env::var(API_KEY_VAR).map_err(|_| ProviderError::MissingApiKey)?;
        Self::new(api_key)
    }

    pub fn new(api_key: impl Into<String>) -> Result<Self, ProviderError> {
        let api_key = api_key.into().trim().to_string();
        if api_key.is_empty() {
            return Err(ProviderError::MissingApiKey);
        }
        Ok(Self {
            client: Client::new(),
            api_key,
        })
    }
}

impl SeriesProvider for FredClient {
    fn name(&self) -> &str {
        "fred"
    }

    fn fetch(&self, request: &SeriesRequest) -> Result<Series, ProviderError> {
        let indicator = request.indicator;
        let mut req = self.client.get(BASE_URL).query(&[
            ("series_id", indicator.series_id()),
            ("api_key", self.api_key.as_str()),
            ("file_type", "json"),
            ("sort_order", "asc"),
        ]);

        if let Some(start) = request.start {
            req = req.query(&[("observation_start", start.to_string())]);
        }
        if let Some(end) = request.end {
            req = req.query(&[("observation_end", end.to_string())]);
        }

        tracing::debug!(
            series_id = indicator.series_id(),
            start = ?request.start,
            end = ?request.end,
            "requesting FRED observations"
        );

        let resp = req.send().map_err(|e| ProviderError::Request {
            indicator,
            message: e.to_string(),
        })?;

        if !resp.status().is_success() {
            return Err(ProviderError::Status {
                indicator,
                status: resp.status().as_u16(),
            });
        }

        let body: ObservationsResponse = resp.json().map_err(|e| ProviderError::Parse {
            indicator,
            message: e.to_string(),
        })?;

        parse_observations(indicator, body)
    }
}

#[derive(Debug, Deserialize)]
struct ObservationsResponse {
    observations: Vec<RawObservation>,
}

#[derive(Debug, Deserialize)]
struct RawObservation {
    date: String,
    value: String,
}

fn parse_observations(
    indicator: Indicator,
    body: ObservationsResponse,
) -> Result<Series, ProviderError> {
    let mut out = Vec::with_capacity(body.observations.len());
    for obs in body.observations {
        let Some(value) = parse_value(&obs.value) else {
            continue;
        };
        let date = NaiveDate::parse_from_str(&obs.date, "%Y-%m-%d").map_err(|e| {
            ProviderError::Parse {
                indicator,
                message: format!("invalid date '{}': {e}", obs.date),
            }
        })?;
        out.push(Observation::new(date, value));
    }

    Ok(Series::new(indicator, out))
}

/// FRED marks missing observations with `"."`.
fn parse_value(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed == "." || trimmed.is_empty() {
        return None;
    }
    let v = trimmed.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}
