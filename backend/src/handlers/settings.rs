//! HTTP handlers for advisory settings

use axum::{extract::State, Json};

use shared::models::settings::AdvisorySettings;

use crate::error::AppResult;
use crate::services::settings::UpdateSettingsInput;
use crate::AppState;

/// Current advisory settings (defaults when none have been saved yet)
pub async fn get_settings(State(state): State<AppState>) -> Json<AdvisorySettings> {
    Json(state.settings.load().await)
}

/// Merge a partial settings update into the stored blob
pub async fn update_settings(
    State(state): State<AppState>,
    Json(input): Json<UpdateSettingsInput>,
) -> AppResult<Json<AdvisorySettings>> {
    let settings = state.settings.update(input).await?;
    Ok(Json(settings))
}
