//! Station payload retrieval
//!
//! Fetches a station's raw payload for a date window, going through the
//! configured relay endpoint first (stations rarely send permissive CORS
//! headers, and the relay keeps browser clients working too) with a single
//! direct-request fallback, then hands the body to the rain-series parser.

use chrono::{Duration, Utc};
use reqwest::{Client, Url};

use shared::models::station::Station;
use shared::rain_series::{self, RainSeriesError};

use crate::error::{AppError, AppResult};

/// Station fetch client
#[derive(Clone)]
pub struct StationClient {
    client: Client,
    relay_url: String,
}

impl StationClient {
    /// Create a new StationClient routing through the given relay endpoint
    pub fn new(client: Client, relay_url: String) -> Self {
        Self { client, relay_url }
    }

    /// Accumulated rain reported by a station over the past `past_days`.
    ///
    /// `None` is the distinguished "unknown" result (station unreachable or
    /// payload unreadable) and must never be coerced to zero rainfall:
    /// callers fall back to the forecast-API historical source instead.
    /// A reachable station whose payload simply lacks the configured
    /// columns yields `Some(0.0)`: no data, but not a failure.
    pub async fn fetch_accumulated_rain(
        &self,
        station: &Station,
        past_days: i64,
    ) -> Option<f64> {
        let end = Utc::now().date_naive();
        let start = end - Duration::days(past_days);
        let target_url = station.resolve_url(start, end);

        let body = match self.fetch_text(&target_url).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(station = %station.name, error = %e, "station fetch failed");
                return None;
            }
        };

        match rain_series::accumulated_rain(&body, station.format, station.resolved_mapping()) {
            Ok(total) => Some(total),
            Err(RainSeriesError::ColumnNotFound { wanted }) => {
                tracing::warn!(
                    station = %station.name,
                    wanted = %wanted,
                    "station payload lacks configured columns, treating as no data"
                );
                Some(0.0)
            }
            Err(e) => {
                tracing::warn!(station = %station.name, error = %e, "station payload unreadable");
                None
            }
        }
    }

    /// Whether the station answers a request for today's window.
    pub async fn probe(&self, station: &Station) -> bool {
        let today = Utc::now().date_naive();
        let target_url = station.resolve_url(today, today);
        self.fetch_text(&target_url).await.is_ok()
    }

    /// Fetch the payload through the relay, retrying once directly.
    async fn fetch_text(&self, target_url: &str) -> AppResult<String> {
        let relay = Url::parse_with_params(&self.relay_url, &[("url", target_url)])
            .map_err(|e| AppError::Configuration(format!("invalid relay URL: {}", e)))?;

        match self.client.get(relay).send().await {
            Ok(response) if response.status().is_success() => {
                return response
                    .text()
                    .await
                    .map_err(|e| AppError::StationUnreachable(e.to_string()));
            }
            Ok(response) => {
                tracing::warn!(status = %response.status(), "relay fetch failed, retrying direct");
            }
            Err(e) => {
                tracing::warn!(error = %e, "relay unreachable, retrying direct");
            }
        }

        let response = self
            .client
            .get(target_url)
            .send()
            .await
            .map_err(|e| AppError::StationUnreachable(e.to_string()))?;
        if !response.status().is_success() {
            return Err(AppError::StationUnreachable(format!(
                "HTTP {}",
                response.status().as_u16()
            )));
        }
        response
            .text()
            .await
            .map_err(|e| AppError::StationUnreachable(e.to_string()))
    }
}
