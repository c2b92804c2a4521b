//! Pass-through relay for station requests
//!
//! Browser clients cannot fetch most station exports directly because the
//! stations do not send permissive CORS headers; this endpoint reissues the
//! request server-side and streams the body back verbatim. The permissive
//! CORS headers themselves come from the router's global CorsLayer.

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RelayQuery {
    pub url: Option<String>,
}

/// Fetch an arbitrary URL on behalf of the client.
///
/// Returns 400 when `url` is missing, the upstream status code when the
/// upstream answers with a failure, and 500 on transport errors.
pub async fn relay_fetch(
    State(state): State<AppState>,
    Query(query): Query<RelayQuery>,
) -> Response {
    let Some(target) = query.url else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "URL parameter is required"})),
        )
            .into_response();
    };

    let result = state
        .http
        .get(&target)
        .header(reqwest::header::USER_AGENT, "Mozilla/5.0")
        .send()
        .await;

    let response = match result {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(error = %e, url = %target, "relay fetch failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Failed to fetch data"})),
            )
                .into_response();
        }
    };

    // reqwest and axum sit on different http versions; carry the code over
    // numerically.
    let status =
        StatusCode::from_u16(response.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    if !status.is_success() {
        return (
            status,
            Json(json!({
                "error": format!("External API returned {}", status.as_u16())
            })),
        )
            .into_response();
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("text/plain; charset=utf-8")
        .to_string();

    match response.text().await {
        Ok(body) => ([(header::CONTENT_TYPE, content_type)], body).into_response(),
        Err(e) => {
            tracing::error!(error = %e, url = %target, "relay body read failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Failed to fetch data"})),
            )
                .into_response()
        }
    }
}
