//! HTTP handlers for station management

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use shared::models::settings::AdvisorySettings;
use shared::models::station::Station;

use crate::error::{AppError, AppResult};
use crate::services::settings::StationInput;
use crate::AppState;

/// List configured stations
pub async fn list_stations(State(state): State<AppState>) -> Json<Vec<Station>> {
    Json(state.settings.load().await.stations)
}

/// Create a station
pub async fn create_station(
    State(state): State<AppState>,
    Json(input): Json<StationInput>,
) -> AppResult<Json<Station>> {
    let station = state.settings.add_station(input).await?;
    Ok(Json(station))
}

/// Replace a station definition
pub async fn update_station(
    State(state): State<AppState>,
    Path(station_id): Path<String>,
    Json(input): Json<StationInput>,
) -> AppResult<Json<Station>> {
    let station = state.settings.update_station(&station_id, input).await?;
    Ok(Json(station))
}

/// Delete a station
pub async fn delete_station(
    State(state): State<AppState>,
    Path(station_id): Path<String>,
) -> AppResult<Json<()>> {
    state.settings.remove_station(&station_id).await?;
    Ok(Json(()))
}

/// Use a station as the historical-rain source
pub async fn select_station(
    State(state): State<AppState>,
    Path(station_id): Path<String>,
) -> AppResult<Json<AdvisorySettings>> {
    let settings = state.settings.select_station(&station_id).await?;
    Ok(Json(settings))
}

/// Go back to forecast-API history
pub async fn clear_station_selection(
    State(state): State<AppState>,
) -> AppResult<Json<AdvisorySettings>> {
    let settings = state.settings.clear_selection().await?;
    Ok(Json(settings))
}

/// Station reachability probe response
#[derive(Debug, Serialize)]
pub struct StationStatusResponse {
    pub id: String,
    pub status: &'static str,
}

/// Probe whether a station currently answers requests
pub async fn get_station_status(
    State(state): State<AppState>,
    Path(station_id): Path<String>,
) -> AppResult<Json<StationStatusResponse>> {
    let settings = state.settings.load().await;
    let station = settings
        .stations
        .iter()
        .find(|s| s.id == station_id)
        .ok_or_else(|| AppError::NotFound("Station".to_string()))?;

    let online = state.stations.probe(station).await;
    Ok(Json(StationStatusResponse {
        id: station_id,
        status: if online { "online" } else { "offline" },
    }))
}
