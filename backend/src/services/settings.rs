//! Advisory settings store
//!
//! Reads and writes the advisory configuration blob as a JSON file.
//! Missing or unreadable blobs fall back to defaults, and updates merge
//! section-wise so partial payloads never wipe unrelated settings.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;
use tokio::sync::Mutex;
use uuid::Uuid;
use validator::Validate;

use shared::models::settings::{AdvisorySettings, ForecastCriteria, Thresholds};
use shared::models::station::{Station, StationFormat};
use shared::validation::{thresholds_are_ordered, validate_station};

use crate::error::{AppError, AppResult};

/// Settings blob store
#[derive(Clone)]
pub struct SettingsStore {
    path: Arc<PathBuf>,
    write_lock: Arc<Mutex<()>>,
}

/// Partial settings update; absent sections are left untouched.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSettingsInput {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
    pub timezone: Option<String>,
    pub thresholds: Option<Thresholds>,
    pub forecast_criteria: Option<ForecastCriteria>,
}

/// Input for creating or replacing a station
#[derive(Debug, Deserialize, Validate)]
pub struct StationInput {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    #[validate(length(min = 1))]
    pub url: String,
    pub format: StationFormat,
    pub mapping: Option<String>,
}

impl StationInput {
    fn into_station(self, id: String) -> Station {
        Station {
            id,
            name: self.name,
            latitude: self.latitude,
            longitude: self.longitude,
            url: self.url,
            format: self.format,
            mapping: self.mapping,
        }
    }
}

fn check(input: &impl Validate) -> AppResult<()> {
    input.validate().map_err(|errors| {
        let field = errors
            .field_errors()
            .keys()
            .next()
            .map(|k| k.to_string())
            .unwrap_or_else(|| "input".to_string());
        AppError::Validation {
            message: format!("Invalid value for {}", field),
            message_es: format!("Valor no válido para {}", field),
            field,
        }
    })
}

fn check_station(station: &Station) -> AppResult<()> {
    validate_station(station).map_err(|message| AppError::Validation {
        field: "station".to_string(),
        message: message.to_string(),
        message_es: "Definición de estación no válida".to_string(),
    })
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Arc::new(path.into()),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Current settings; defaults when the blob is missing or unreadable.
    pub async fn load(&self) -> AdvisorySettings {
        match tokio::fs::read_to_string(&*self.path).await {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(settings) => settings,
                Err(e) => {
                    tracing::warn!(error = %e, "stored settings unreadable, using defaults");
                    AdvisorySettings::default()
                }
            },
            Err(_) => AdvisorySettings::default(),
        }
    }

    pub async fn save(&self, settings: &AdvisorySettings) -> AppResult<()> {
        let raw = serde_json::to_string_pretty(settings)
            .map_err(|e| AppError::Internal(format!("Failed to serialize settings: {}", e)))?;
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::Internal(format!("Failed to create {:?}: {}", parent, e)))?;
        }
        tokio::fs::write(&*self.path, raw)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to write settings: {}", e)))
    }

    /// Merge a partial update into the stored blob.
    pub async fn update(&self, input: UpdateSettingsInput) -> AppResult<AdvisorySettings> {
        check(&input)?;
        let _guard = self.write_lock.lock().await;

        let mut settings = self.load().await;
        if let Some(latitude) = input.latitude {
            settings.coordinates.latitude = latitude;
        }
        if let Some(longitude) = input.longitude {
            settings.coordinates.longitude = longitude;
        }
        if let Some(timezone) = input.timezone {
            settings.timezone = timezone;
        }
        if let Some(thresholds) = input.thresholds {
            settings.thresholds = thresholds;
        }
        if let Some(criteria) = input.forecast_criteria {
            settings.forecast_criteria = criteria;
        }

        // Misordered thresholds are accepted (the rule engine tolerates
        // them) but worth flagging.
        if !thresholds_are_ordered(&settings.thresholds) {
            tracing::warn!(thresholds = ?settings.thresholds, "thresholds are not in ascending order");
        }

        self.save(&settings).await?;
        Ok(settings)
    }

    pub async fn add_station(&self, input: StationInput) -> AppResult<Station> {
        check(&input)?;
        let station = input.into_station(Uuid::new_v4().to_string());
        check_station(&station)?;

        let _guard = self.write_lock.lock().await;
        let mut settings = self.load().await;
        settings.stations.push(station.clone());
        self.save(&settings).await?;
        Ok(station)
    }

    pub async fn update_station(&self, id: &str, input: StationInput) -> AppResult<Station> {
        check(&input)?;
        let station = input.into_station(id.to_string());
        check_station(&station)?;

        let _guard = self.write_lock.lock().await;
        let mut settings = self.load().await;
        let slot = settings
            .stations
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| AppError::NotFound("Station".to_string()))?;
        *slot = station.clone();
        self.save(&settings).await?;
        Ok(station)
    }

    pub async fn remove_station(&self, id: &str) -> AppResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut settings = self.load().await;
        let before = settings.stations.len();
        settings.stations.retain(|s| s.id != id);
        if settings.stations.len() == before {
            return Err(AppError::NotFound("Station".to_string()));
        }
        if settings.selected_station_id.as_deref() == Some(id) {
            settings.selected_station_id = None;
        }
        self.save(&settings).await
    }

    pub async fn select_station(&self, id: &str) -> AppResult<AdvisorySettings> {
        let _guard = self.write_lock.lock().await;
        let mut settings = self.load().await;
        if !settings.stations.iter().any(|s| s.id == id) {
            return Err(AppError::NotFound("Station".to_string()));
        }
        settings.selected_station_id = Some(id.to_string());
        self.save(&settings).await?;
        Ok(settings)
    }

    /// Go back to forecast-API history for the historical source.
    pub async fn clear_selection(&self) -> AppResult<AdvisorySettings> {
        let _guard = self.write_lock.lock().await;
        let mut settings = self.load().await;
        settings.selected_station_id = None;
        self.save(&settings).await?;
        Ok(settings)
    }
}
