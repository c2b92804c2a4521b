//! Siembra Sowing-Window Advisory - Backend Server
//!
//! Rainfall-driven sowing-window recommendations for semi-arid
//! reforestation: accumulates recent rain from a configured station or the
//! forecast API, checks follow-up rain, and classifies the result.

use axum::{routing::get, Router};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod external;
mod handlers;
mod routes;
mod services;

pub use config::Config;

use external::{ForecastClient, StationClient};
use services::{DashboardService, HistoryService, SettingsStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub http: reqwest::Client,
    pub settings: SettingsStore,
    pub stations: StationClient,
    pub dashboard: DashboardService,
    pub history: HistoryService,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "siembra_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::load()?;

    tracing::info!("Starting Siembra Advisory Server");
    tracing::info!("Environment: {}", config.environment);

    // Shared HTTP client for all outbound requests
    let http = reqwest::Client::new();
    let forecast = ForecastClient::with_base_url(http.clone(), config.forecast.base_url.clone());
    let stations = StationClient::new(http.clone(), config.station.relay_url.clone());
    let settings = SettingsStore::new(config.settings.path.clone());

    // Create application state
    let state = AppState {
        dashboard: DashboardService::new(forecast, stations.clone()),
        history: HistoryService::new(),
        stations,
        settings,
        http,
        config: Arc::new(config.clone()),
    };

    // Build application
    let app = create_app(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Siembra Sowing-Window Advisory API v1.0"
}
