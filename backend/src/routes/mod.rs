//! Route definitions for the Siembra advisory server

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Advisory dashboard
        .route("/dashboard", get(handlers::get_dashboard))
        // Pass-through relay for station requests
        .route("/proxy", get(handlers::relay_fetch))
        // Advisory settings blob
        .nest("/settings", settings_routes())
        // Station management
        .nest("/stations", station_routes())
        // Historical calendar
        .nest("/history", history_routes())
}

/// Settings routes
fn settings_routes() -> Router<AppState> {
    Router::new().route(
        "/",
        get(handlers::get_settings).put(handlers::update_settings),
    )
}

/// Station management routes
fn station_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_stations).post(handlers::create_station),
        )
        .route("/selection", delete(handlers::clear_station_selection))
        .route(
            "/:station_id",
            put(handlers::update_station).delete(handlers::delete_station),
        )
        .route("/:station_id/select", post(handlers::select_station))
        .route("/:station_id/status", get(handlers::get_station_status))
}

/// Historical calendar routes
fn history_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::get_history))
        .route("/export", get(handlers::export_history))
}
