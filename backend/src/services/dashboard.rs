//! Dashboard orchestration
//!
//! Drives one advisory refresh: resolves the historical-rain source
//! (selected station with forecast-API fallback), fetches history and
//! forecast concurrently, and classifies the result.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;

use shared::models::forecast::DailyOutlook;
use shared::models::recommendation::{classify, Recommendation};
use shared::models::settings::AdvisorySettings;
use shared::types::GpsCoordinates;

use crate::error::{AppError, AppResult};
use crate::external::{ForecastClient, StationClient};

/// Historical accumulation window, in days.
pub const PAST_DAYS: u32 = 7;

/// Source labels when the forecast API provides the historical total.
const SOURCE_API_HISTORY: &str = "Open-Meteo (Histórico)";
const SOURCE_API_FALLBACK: &str = "Open-Meteo (Estimado)";

/// One fully-assembled advisory refresh.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub generation: u64,
    pub recommendation: Recommendation,
    pub seven_day_total_mm: f64,
    pub forecast_total_mm: f64,
    /// Human-readable label of the historical-rain source.
    pub source: String,
    pub used_station: bool,
    pub location: GpsCoordinates,
    pub outlook: Vec<DailyOutlook>,
}

/// Dashboard orchestration service
#[derive(Clone)]
pub struct DashboardService {
    forecast: ForecastClient,
    stations: StationClient,
    generations: Arc<AtomicU64>,
}

impl DashboardService {
    pub fn new(forecast: ForecastClient, stations: StationClient) -> Self {
        Self {
            forecast,
            stations,
            generations: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Claim a refresh generation. Results of runs that are no longer the
    /// latest generation when they finish are discarded, so a slow
    /// in-flight refresh can never clobber a newer one.
    pub fn begin_refresh(&self) -> u64 {
        self.generations.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generations.load(Ordering::SeqCst) == generation
    }

    /// Run one advisory refresh against the given settings.
    pub async fn run(
        &self,
        settings: &AdvisorySettings,
        generation: u64,
    ) -> AppResult<DashboardSnapshot> {
        let criteria = &settings.forecast_criteria;
        let forecast_days = criteria.effective_forecast_days();
        let min_follow_up = criteria.effective_min_follow_up_rain_mm();
        let selected = settings.selected_station();

        // History and forecast come from one series request; the station
        // fetch (when a station is selected) runs concurrently with it.
        let series_fut = self.forecast.fetch_daily_series(
            &settings.coordinates,
            PAST_DAYS,
            forecast_days,
            &settings.timezone,
        );
        let station_fut = async {
            match selected {
                Some(station) => self
                    .stations
                    .fetch_accumulated_rain(station, i64::from(PAST_DAYS))
                    .await
                    .map(|total| (station.name.clone(), total)),
                None => None,
            }
        };
        let (series, station_rain) = tokio::join!(series_fut, station_fut);
        let series = series?;

        let (seven_day_total, source, used_station) = match station_rain {
            Some((name, total)) => (total, name, true),
            None => {
                let label = if selected.is_some() {
                    tracing::warn!(
                        "selected station unavailable, falling back to forecast API history"
                    );
                    SOURCE_API_FALLBACK
                } else {
                    SOURCE_API_HISTORY
                };
                (
                    series.historical_total(PAST_DAYS as usize),
                    label.to_string(),
                    false,
                )
            }
        };

        let forecast_total = series.forward_total(PAST_DAYS as usize);
        let recommendation = classify(
            seven_day_total,
            forecast_total,
            &settings.thresholds,
            min_follow_up,
            forecast_days,
        );

        if !self.is_current(generation) {
            return Err(AppError::StaleRefresh);
        }

        Ok(DashboardSnapshot {
            generation,
            recommendation,
            seven_day_total_mm: seven_day_total,
            forecast_total_mm: forecast_total,
            source,
            used_station,
            location: settings.coordinates,
            outlook: series.forward_outlook(PAST_DAYS as usize),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::get, Router};
    use reqwest::Client;
    use shared::models::recommendation::RecommendationLevel;
    use shared::models::station::{Station, StationFormat};

    /// 7 past days summing 45.0 mm, 7 forward days summing 6.0 mm.
    const SERIES_JSON: &str = r#"{
        "daily": {
            "time": ["2024-03-01","2024-03-02","2024-03-03","2024-03-04","2024-03-05","2024-03-06","2024-03-07",
                     "2024-03-08","2024-03-09","2024-03-10","2024-03-11","2024-03-12","2024-03-13","2024-03-14"],
            "precipitation_sum": [10.0, 5.0, 0.0, null, 20.0, 5.0, 5.0,
                                  1.0, 2.0, 0.0, null, 3.0, 0.0, 0.0],
            "precipitation_probability_mean": [80, 40, 0, null, 90, 30, 20,
                                               10, 25, 0, null, 60, 0, 0]
        }
    }"#;

    async fn spawn(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    async fn forecast_base() -> String {
        spawn(Router::new().route(
            "/forecast",
            get(|| async {
                (
                    [(axum::http::header::CONTENT_TYPE, "application/json")],
                    SERIES_JSON,
                )
            }),
        ))
        .await
    }

    fn service(forecast_base: String) -> DashboardService {
        let http = Client::new();
        DashboardService::new(
            ForecastClient::with_base_url(http.clone(), forecast_base),
            // Relay on a refused port; station fetches fall through to the
            // direct request.
            StationClient::new(http, "http://127.0.0.1:1/api/v1/proxy".to_string()),
        )
    }

    fn settings_with_station(url: Option<String>) -> AdvisorySettings {
        let mut settings = AdvisorySettings::default();
        if let Some(url) = url {
            settings.stations.push(Station {
                id: "st-1".to_string(),
                name: "Meteo Elx".to_string(),
                latitude: 38.27,
                longitude: -0.70,
                url,
                format: StationFormat::Csv,
                mapping: None,
            });
            settings.selected_station_id = Some("st-1".to_string());
        }
        settings
    }

    #[tokio::test]
    async fn test_api_history_when_no_station_selected() {
        let svc = service(forecast_base().await);
        let settings = settings_with_station(None);

        let generation = svc.begin_refresh();
        let snapshot = svc.run(&settings, generation).await.unwrap();

        assert_eq!(snapshot.seven_day_total_mm, 45.0);
        assert_eq!(snapshot.forecast_total_mm, 6.0);
        assert_eq!(snapshot.source, "Open-Meteo (Histórico)");
        assert!(!snapshot.used_station);
        // 45mm with 6mm follow-up against default 40/70/90 thresholds.
        assert_eq!(
            snapshot.recommendation.level,
            RecommendationLevel::Favorable
        );
        assert_eq!(snapshot.outlook.len(), 7);
    }

    #[tokio::test]
    async fn test_station_total_wins_when_station_answers() {
        let station_base = spawn(Router::new().route(
            "/export.csv",
            get(|| async {
                "dateutc,rainratein\n\
                 2024-03-01T10:00:00Z,0.0\n\
                 2024-03-01T11:00:00Z,95.0\n"
            }),
        ))
        .await;
        let svc = service(forecast_base().await);
        let settings = settings_with_station(Some(format!("{station_base}/export.csv")));

        let generation = svc.begin_refresh();
        let snapshot = svc.run(&settings, generation).await.unwrap();

        assert_eq!(snapshot.seven_day_total_mm, 95.0);
        assert_eq!(snapshot.source, "Meteo Elx");
        assert!(snapshot.used_station);
        assert_eq!(snapshot.recommendation.level, RecommendationLevel::Perfecta);
    }

    #[tokio::test]
    async fn test_dead_station_falls_back_to_api_history() {
        // The station is unreachable: the seven-day total must come from
        // the forecast API (45.0), never be coerced to 0.
        let svc = service(forecast_base().await);
        let settings =
            settings_with_station(Some("http://127.0.0.1:1/export.csv".to_string()));

        let generation = svc.begin_refresh();
        let snapshot = svc.run(&settings, generation).await.unwrap();

        assert_eq!(snapshot.seven_day_total_mm, 45.0);
        assert_eq!(snapshot.source, "Open-Meteo (Estimado)");
        assert!(!snapshot.used_station);
        assert_eq!(
            snapshot.recommendation.level,
            RecommendationLevel::Favorable
        );
    }

    #[tokio::test]
    async fn test_superseded_refresh_is_discarded() {
        let svc = service(forecast_base().await);
        let settings = settings_with_station(None);

        let stale = svc.begin_refresh();
        let newer = svc.begin_refresh();

        let result = svc.run(&settings, stale).await;
        assert!(matches!(result, Err(AppError::StaleRefresh)));

        let snapshot = svc.run(&settings, newer).await.unwrap();
        assert_eq!(snapshot.generation, newer);
    }

    #[tokio::test]
    async fn test_forecast_failure_is_fatal() {
        let base = spawn(Router::new().route(
            "/forecast",
            get(|| async { (axum::http::StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        ))
        .await;
        let svc = service(base);
        let settings = settings_with_station(None);

        let generation = svc.begin_refresh();
        let result = svc.run(&settings, generation).await;
        assert!(matches!(
            result,
            Err(AppError::UpstreamError { status: 500 })
        ));
    }
}
