//! Open-Meteo client for daily precipitation series
//!
//! One request covers both the historical and the forward window; consumers
//! slice the returned series at the `past_days` index.

use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;

use shared::models::forecast::DailySeries;
use shared::types::GpsCoordinates;

use crate::error::{AppError, AppResult};

/// Daily metrics requested from the forecast API.
const DAILY_METRICS: &str = "precipitation_sum,precipitation_probability_mean";

/// Forecast API client
#[derive(Clone)]
pub struct ForecastClient {
    client: Client,
    base_url: String,
}

/// Open-Meteo forecast response envelope
#[derive(Debug, Deserialize)]
struct OMForecastResponse {
    daily: Option<OMDaily>,
}

#[derive(Debug, Deserialize)]
struct OMDaily {
    time: Vec<NaiveDate>,
    precipitation_sum: Option<Vec<Option<f64>>>,
    precipitation_probability_mean: Option<Vec<Option<i32>>>,
}

impl ForecastClient {
    /// Create a new ForecastClient
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: "https://api.open-meteo.com/v1".to_string(),
        }
    }

    /// Create a new ForecastClient with custom base URL (for testing)
    pub fn with_base_url(client: Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    /// Fetch the daily precipitation series around a coordinate pair.
    ///
    /// Entries `[0, past_days)` are historical, the rest are the forward
    /// forecast window.
    pub async fn fetch_daily_series(
        &self,
        coordinates: &GpsCoordinates,
        past_days: u32,
        forecast_days: u32,
        timezone: &str,
    ) -> AppResult<DailySeries> {
        let url = format!(
            "{}/forecast?latitude={}&longitude={}&past_days={}&forecast_days={}&daily={}&timezone={}",
            self.base_url,
            coordinates.latitude,
            coordinates.longitude,
            past_days,
            forecast_days,
            DAILY_METRICS,
            timezone
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("Forecast API request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::UpstreamError {
                status: response.status().as_u16(),
            });
        }

        let data: OMForecastResponse = response
            .json()
            .await
            .map_err(|e| AppError::MalformedResponse(e.to_string()))?;

        Self::convert_response(data)
    }

    /// Validate the daily arrays and convert them into a `DailySeries`.
    fn convert_response(data: OMForecastResponse) -> AppResult<DailySeries> {
        let daily = data
            .daily
            .ok_or_else(|| AppError::MalformedResponse("missing daily block".to_string()))?;

        let precipitation_sum = daily.precipitation_sum.ok_or_else(|| {
            AppError::MalformedResponse("missing daily.precipitation_sum".to_string())
        })?;
        // The probability array may be left out by upstream; pad it so the
        // series stays index-aligned.
        let precipitation_probability_mean = daily
            .precipitation_probability_mean
            .unwrap_or_else(|| vec![None; daily.time.len()]);

        if precipitation_sum.len() != daily.time.len()
            || precipitation_probability_mean.len() != daily.time.len()
        {
            return Err(AppError::MalformedResponse(format!(
                "daily arrays misaligned: {} dates, {} sums, {} probabilities",
                daily.time.len(),
                precipitation_sum.len(),
                precipitation_probability_mean.len()
            )));
        }

        Ok(DailySeries {
            dates: daily.time,
            precipitation_sum,
            precipitation_probability_mean,
        })
    }
}
