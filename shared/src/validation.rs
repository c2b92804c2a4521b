//! Validation utilities for the advisory settings boundary
//!
//! The rule engine itself never validates its inputs; these helpers guard
//! the configuration endpoints instead.

use crate::models::settings::Thresholds;
use crate::models::station::Station;

/// Validate that a coordinate pair is on the globe.
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), &'static str> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err("Latitude must be between -90 and 90");
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err("Longitude must be between -180 and 180");
    }
    Ok(())
}

/// Whether thresholds follow the intended minimum < optimal < perfect order.
///
/// Misordered thresholds are accepted (the engine evaluates its rules
/// top-down regardless); callers use this to log a warning.
pub fn thresholds_are_ordered(thresholds: &Thresholds) -> bool {
    thresholds.minimum < thresholds.optimal && thresholds.optimal < thresholds.perfect
}

/// Validate a station definition before it enters the configuration blob.
pub fn validate_station(station: &Station) -> Result<(), &'static str> {
    if station.name.trim().is_empty() {
        return Err("Station name cannot be empty");
    }
    if !station.url.starts_with("http://") && !station.url.starts_with("https://") {
        return Err("Station URL must be an http(s) URL");
    }
    validate_coordinates(station.latitude, station.longitude)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::station::StationFormat;

    fn station() -> Station {
        Station {
            id: "st-1".to_string(),
            name: "Meteo Elx".to_string(),
            latitude: 38.27,
            longitude: -0.70,
            url: "https://example.com/export.csv".to_string(),
            format: StationFormat::Csv,
            mapping: None,
        }
    }

    #[test]
    fn test_validate_coordinates_bounds() {
        assert!(validate_coordinates(38.27, -0.70).is_ok());
        assert!(validate_coordinates(90.0, 180.0).is_ok());
        assert!(validate_coordinates(-90.0, -180.0).is_ok());
        assert!(validate_coordinates(90.1, 0.0).is_err());
        assert!(validate_coordinates(0.0, -180.5).is_err());
    }

    #[test]
    fn test_thresholds_ordering() {
        assert!(thresholds_are_ordered(&Thresholds {
            minimum: 40.0,
            optimal: 70.0,
            perfect: 90.0
        }));
        assert!(!thresholds_are_ordered(&Thresholds {
            minimum: 70.0,
            optimal: 40.0,
            perfect: 90.0
        }));
        assert!(!thresholds_are_ordered(&Thresholds {
            minimum: 40.0,
            optimal: 90.0,
            perfect: 90.0
        }));
    }

    #[test]
    fn test_validate_station() {
        assert!(validate_station(&station()).is_ok());

        let mut unnamed = station();
        unnamed.name = "  ".to_string();
        assert!(validate_station(&unnamed).is_err());

        let mut bad_url = station();
        bad_url.url = "ftp://example.com/export.csv".to_string();
        assert!(validate_station(&bad_url).is_err());

        let mut off_globe = station();
        off_globe.latitude = 123.0;
        assert!(validate_station(&off_globe).is_err());
    }
}
