//! Rainfall accumulation over raw station payloads
//!
//! Normalizes a station response (CSV rain-rate rows or a JSON document)
//! into a single accumulated-rainfall figure in millimeters. Both paths are
//! pure functions over the payload text; the date window is bounded
//! upstream by URL substitution, so everything in the payload participates.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;
use thiserror::Error;

use crate::models::station::StationFormat;

/// Fixed date-column name in CSV station payloads.
const DATE_COLUMN: &str = "dateutc";

/// Gaps longer than this do not accumulate rain; they are assumed to be
/// station outages rather than dry sampling intervals.
const MAX_GAP_HOURS: f64 = 24.0;

/// Failures the caller degrades to "no data" rather than aborting on.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RainSeriesError {
    /// The CSV header lacks the date column or the configured rain column.
    #[error("required columns not found: {wanted}")]
    ColumnNotFound { wanted: String },
    /// The payload is not valid JSON.
    #[error("invalid station payload: {0}")]
    InvalidPayload(String),
}

/// One parsed CSV sample. Transient: built per call, never persisted.
#[derive(Debug, Clone, PartialEq)]
struct RainRecord {
    timestamp: DateTime<Utc>,
    /// Instantaneous rain rate in mm/hour.
    rain_rate: f64,
}

/// Accumulated rainfall for a raw station payload.
pub fn accumulated_rain(
    payload: &str,
    format: StationFormat,
    mapping: &str,
) -> Result<f64, RainSeriesError> {
    match format {
        StationFormat::Csv => accumulate_csv(payload, mapping),
        StationFormat::Json => accumulate_json(payload, mapping),
    }
}

/// Integrate a CSV rain-rate series.
///
/// Each record's instantaneous rate is applied backward over the interval
/// since the previous sample (`rate * delta_hours`), not averaged with the
/// previous rate. This matches the reference numeric method and is a
/// deliberate modeling choice.
fn accumulate_csv(payload: &str, rain_column: &str) -> Result<f64, RainSeriesError> {
    let mut rows = payload.trim().lines();

    let headers: Vec<String> = rows.next().map(header_cells).unwrap_or_default();
    let date_index = headers.iter().position(|h| h == DATE_COLUMN);
    let rain_index = headers.iter().position(|h| h == rain_column);
    let (date_index, rain_index) = match (date_index, rain_index) {
        (Some(d), Some(r)) => (d, r),
        _ => {
            return Err(RainSeriesError::ColumnNotFound {
                wanted: format!("{DATE_COLUMN}, {rain_column}"),
            })
        }
    };

    // Keep-first deduplication by exact timestamp, in row order.
    let mut seen: HashSet<DateTime<Utc>> = HashSet::new();
    let mut records: Vec<RainRecord> = Vec::new();
    for row in rows {
        let cells = row_cells(row);
        let (Some(date_cell), Some(rain_cell)) = (cells.get(date_index), cells.get(rain_index))
        else {
            continue;
        };
        let Ok(rain_rate) = rain_cell.parse::<f64>() else {
            continue;
        };
        let Some(timestamp) = parse_utc_instant(date_cell) else {
            continue;
        };
        if seen.insert(timestamp) {
            records.push(RainRecord {
                timestamp,
                rain_rate,
            });
        }
    }

    records.sort_by_key(|r| r.timestamp);

    let mut total = 0.0;
    for pair in records.windows(2) {
        let delta_hours =
            (pair[1].timestamp - pair[0].timestamp).num_milliseconds() as f64 / 3_600_000.0;
        if delta_hours > MAX_GAP_HOURS || delta_hours < 0.0 {
            continue;
        }
        total += pair[1].rain_rate * delta_hours;
    }
    Ok(total)
}

/// Walk a dot-separated path into a JSON document and sum what it finds.
fn accumulate_json(payload: &str, path: &str) -> Result<f64, RainSeriesError> {
    let root: Value = serde_json::from_str(payload)
        .map_err(|e| RainSeriesError::InvalidPayload(e.to_string()))?;

    let mut current = Some(&root);
    for key in path.split('.') {
        current = current.and_then(|v| v.get(key));
    }

    Ok(match current {
        Some(Value::Array(items)) => items.iter().map(|v| v.as_f64().unwrap_or(0.0)).sum(),
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        _ => 0.0,
    })
}

/// Header cells are lower-cased and stripped of any quote characters.
fn header_cells(line: &str) -> Vec<String> {
    line.split(|c| c == ';' || c == ',')
        .map(|h| h.trim().to_lowercase().replace(['"', '\''], ""))
        .collect()
}

/// Data cells lose one surrounding quote pair, then outer whitespace.
fn row_cells(line: &str) -> Vec<String> {
    line.split(|c| c == ';' || c == ',')
        .map(|c| {
            let c = c.strip_prefix('"').unwrap_or(c);
            let c = c.strip_suffix('"').unwrap_or(c);
            c.trim().to_string()
        })
        .collect()
}

/// Parse a station timestamp, treating naive values as UTC.
///
/// Strings without a trailing `Z` get one appended before parsing, mirroring
/// the station feeds this service was built against (offset-bearing
/// timestamps therefore fail to parse and their rows are dropped).
fn parse_utc_instant(raw: &str) -> Option<DateTime<Utc>> {
    let candidate = if raw.ends_with('Z') {
        raw.to_string()
    } else {
        format!("{raw}Z")
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(&candidate) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(&candidate.replacen(' ', "T", 1)) {
        return Some(dt.with_timezone(&Utc));
    }

    // Space-separated forms without seconds, as some exports emit.
    let naive = candidate.trim_end_matches('Z');
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(naive, fmt) {
            return Some(dt.and_utc());
        }
    }
    None
}
