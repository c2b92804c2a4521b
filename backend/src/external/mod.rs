//! External API integrations

pub mod open_meteo;
pub mod station;

pub use open_meteo::ForecastClient;
pub use station::StationClient;
