//! HTTP handlers for the advisory dashboard

use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::services::dashboard::DashboardSnapshot;
use crate::AppState;

/// Run one advisory refresh and return the assembled dashboard.
///
/// Each request claims a fresh generation; if a newer request starts while
/// this one is still fetching, this one is discarded with a conflict rather
/// than overwriting newer results.
pub async fn get_dashboard(State(state): State<AppState>) -> AppResult<Json<DashboardSnapshot>> {
    let settings = state.settings.load().await;
    let generation = state.dashboard.begin_refresh();
    let snapshot = state.dashboard.run(&settings, generation).await?;
    Ok(Json(snapshot))
}
