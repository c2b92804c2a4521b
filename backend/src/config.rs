//! Configuration management for the Siembra advisory server
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with SIEMBRA_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Forecast API configuration
    pub forecast: ForecastConfig,

    /// Station fetch configuration
    pub station: StationConfig,

    /// Advisory settings blob location
    pub settings: SettingsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ForecastConfig {
    /// Forecast API base URL
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StationConfig {
    /// Relay endpoint that station requests go through before falling back
    /// to a direct fetch
    pub relay_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SettingsConfig {
    /// Path of the advisory settings JSON blob
    pub path: String,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("SIEMBRA_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("forecast.base_url", "https://api.open-meteo.com/v1")?
            .set_default("station.relay_url", "http://127.0.0.1:3000/api/v1/proxy")?
            .set_default("settings.path", "config/advisory.json")?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (SIEMBRA_ prefix)
            .add_source(
                Environment::with_prefix("SIEMBRA")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}
