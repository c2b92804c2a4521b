//! User-defined rain station models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Column holding the rain rate in CSV station payloads, unless overridden.
pub const DEFAULT_CSV_RAIN_COLUMN: &str = "rainratein";

/// Dot-separated path to the rain values in JSON station payloads, unless
/// overridden.
pub const DEFAULT_JSON_RAIN_PATH: &str = "daily.rain";

/// Payload format declared for a station, each handled by its own parser.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StationFormat {
    Csv,
    Json,
}

/// A user-defined rain station.
///
/// Stations are created and edited through the configuration endpoints and
/// are read-only to the advisory engine. The `url` may contain
/// `{startDate}` / `{endDate}` placeholders that are substituted with the
/// requested date window before fetching.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Station {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub url: String,
    pub format: StationFormat,
    #[serde(default)]
    pub mapping: Option<String>,
}

impl Station {
    /// Rain column name (CSV) or value path (JSON) for this station,
    /// falling back to the per-format default when unset or empty.
    pub fn resolved_mapping(&self) -> &str {
        match self.mapping.as_deref() {
            Some(m) if !m.is_empty() => m,
            _ => match self.format {
                StationFormat::Csv => DEFAULT_CSV_RAIN_COLUMN,
                StationFormat::Json => DEFAULT_JSON_RAIN_PATH,
            },
        }
    }

    /// Substitute the date-window placeholders into the station URL.
    pub fn resolve_url(&self, start: NaiveDate, end: NaiveDate) -> String {
        self.url
            .replace("{startDate}", &start.format("%Y-%m-%d").to_string())
            .replace("{endDate}", &end.format("%Y-%m-%d").to_string())
    }
}
