//! HTTP handlers for the historical calendar

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use shared::models::history::YearlyOutcome;

use crate::error::AppResult;
use crate::AppState;

/// The historical sowing calendar, oldest year first
pub async fn get_history(State(state): State<AppState>) -> Json<Vec<YearlyOutcome>> {
    Json(state.history.calendar())
}

/// Export the historical calendar as CSV
pub async fn export_history(State(state): State<AppState>) -> AppResult<Response> {
    let csv = state.history.export_to_csv(&state.history.calendar())?;
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"calendario-siembra.csv\"",
            ),
        ],
        csv,
    )
        .into_response())
}
