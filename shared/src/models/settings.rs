//! Advisory configuration blob
//!
//! The whole dashboard is driven by one structured settings record that the
//! surrounding application persists as a JSON blob. Every field carries a
//! serde default so a partially-written or older blob merges cleanly with
//! the defaults, section by section.

use serde::{Deserialize, Serialize};

use crate::models::station::Station;
use crate::types::GpsCoordinates;

/// Rainfall thresholds in millimeters, ascending.
///
/// `minimum < optimal < perfect` is the caller's responsibility; the rule
/// engine evaluates its branches top-down whatever the values are.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Thresholds {
    pub minimum: f64,
    pub optimal: f64,
    pub perfect: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            minimum: 40.0,
            optimal: 70.0,
            perfect: 90.0,
        }
    }
}

/// Forward-looking forecast criteria.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ForecastCriteria {
    pub min_rain_mm: f64,
    /// Kept as configuration; the classification does not consult it.
    pub min_probability_percent: i32,
    pub forecast_days: u32,
    pub min_follow_up_rain_mm: f64,
}

impl Default for ForecastCriteria {
    fn default() -> Self {
        Self {
            min_rain_mm: 1.0,
            min_probability_percent: 30,
            forecast_days: 7,
            min_follow_up_rain_mm: 5.0,
        }
    }
}

impl ForecastCriteria {
    /// Forward window length; an explicit 0 falls back to the default.
    pub fn effective_forecast_days(&self) -> u32 {
        if self.forecast_days == 0 {
            7
        } else {
            self.forecast_days
        }
    }

    /// Follow-up rain threshold; an explicit 0 falls back to the default.
    pub fn effective_min_follow_up_rain_mm(&self) -> f64 {
        if self.min_follow_up_rain_mm == 0.0 {
            5.0
        } else {
            self.min_follow_up_rain_mm
        }
    }
}

/// The advisory settings blob.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AdvisorySettings {
    pub coordinates: GpsCoordinates,
    pub timezone: String,
    pub thresholds: Thresholds,
    pub forecast_criteria: ForecastCriteria,
    pub stations: Vec<Station>,
    pub selected_station_id: Option<String>,
}

impl Default for AdvisorySettings {
    fn default() -> Self {
        Self {
            // Campo de Elche reforestation area
            coordinates: GpsCoordinates::new(38.27, -0.70),
            timezone: "Europe/Madrid".to_string(),
            thresholds: Thresholds::default(),
            forecast_criteria: ForecastCriteria::default(),
            stations: Vec::new(),
            selected_station_id: None,
        }
    }
}

impl AdvisorySettings {
    /// The station the user selected as historical-rain source, if it still
    /// exists in the station list.
    pub fn selected_station(&self) -> Option<&Station> {
        self.selected_station_id
            .as_deref()
            .and_then(|id| self.stations.iter().find(|s| s.id == id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_values() {
        let settings = AdvisorySettings::default();
        assert_eq!(settings.coordinates, GpsCoordinates::new(38.27, -0.70));
        assert_eq!(settings.timezone, "Europe/Madrid");
        assert_eq!(settings.thresholds.minimum, 40.0);
        assert_eq!(settings.thresholds.optimal, 70.0);
        assert_eq!(settings.thresholds.perfect, 90.0);
        assert_eq!(settings.forecast_criteria.forecast_days, 7);
        assert_eq!(settings.forecast_criteria.min_follow_up_rain_mm, 5.0);
        assert!(settings.stations.is_empty());
        assert!(settings.selected_station_id.is_none());
    }

    #[test]
    fn test_partial_blob_merges_with_defaults() {
        // An older blob that only knows about thresholds.perfect keeps the
        // default values for everything it does not mention.
        let settings: AdvisorySettings =
            serde_json::from_str(r#"{"thresholds": {"perfect": 120.0}}"#).unwrap();
        assert_eq!(settings.thresholds.perfect, 120.0);
        assert_eq!(settings.thresholds.minimum, 40.0);
        assert_eq!(settings.thresholds.optimal, 70.0);
        assert_eq!(settings.timezone, "Europe/Madrid");
    }

    #[test]
    fn test_selected_station_requires_known_id() {
        let mut settings = AdvisorySettings::default();
        settings.selected_station_id = Some("ghost".to_string());
        assert!(settings.selected_station().is_none());
    }

    #[test]
    fn test_zeroed_criteria_fall_back_to_defaults() {
        let criteria = ForecastCriteria {
            forecast_days: 0,
            min_follow_up_rain_mm: 0.0,
            ..ForecastCriteria::default()
        };
        assert_eq!(criteria.effective_forecast_days(), 7);
        assert_eq!(criteria.effective_min_follow_up_rain_mm(), 5.0);
    }
}
