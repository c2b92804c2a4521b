//! Error handling for the Siembra advisory server
//!
//! Provides consistent error responses in English and Spanish

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use shared::rain_series::RainSeriesError;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Station data errors (absorbed at call sites, degrade to "no data")
    #[error("Required columns not found: {wanted}")]
    ColumnNotFound { wanted: String },

    #[error("Invalid station payload: {0}")]
    InvalidPayload(String),

    #[error("Station unreachable: {0}")]
    StationUnreachable(String),

    // Forecast source errors (fatal to the current refresh)
    #[error("Forecast service returned status {status}")]
    UpstreamError { status: u16 },

    #[error("Malformed forecast response: {0}")]
    MalformedResponse(String),

    // Refresh coordination
    #[error("Refresh superseded by a newer one")]
    StaleRefresh,

    // Validation errors
    #[error("Validation error: {message}")]
    Validation {
        field: String,
        message: String,
        message_es: String,
    },

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

impl From<RainSeriesError> for AppError {
    fn from(err: RainSeriesError) -> Self {
        match err {
            RainSeriesError::ColumnNotFound { wanted } => AppError::ColumnNotFound { wanted },
            RainSeriesError::InvalidPayload(msg) => AppError::InvalidPayload(msg),
        }
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message_en: String,
    pub message_es: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::ColumnNotFound { wanted } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail {
                    code: "COLUMN_NOT_FOUND".to_string(),
                    message_en: format!("Required columns not found: {}", wanted),
                    message_es: format!("Columnas requeridas no encontradas: {}", wanted),
                    field: None,
                },
            ),
            AppError::InvalidPayload(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail {
                    code: "INVALID_PAYLOAD".to_string(),
                    message_en: format!("Invalid station payload: {}", msg),
                    message_es: format!("Respuesta de estación inválida: {}", msg),
                    field: None,
                },
            ),
            AppError::StationUnreachable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorDetail {
                    code: "STATION_UNREACHABLE".to_string(),
                    message_en: format!("Station unreachable: {}", msg),
                    message_es: format!("Estación inaccesible: {}", msg),
                    field: None,
                },
            ),
            AppError::UpstreamError { status } => (
                StatusCode::BAD_GATEWAY,
                ErrorDetail {
                    code: "UPSTREAM_ERROR".to_string(),
                    message_en: format!("Forecast service returned status {}", status),
                    message_es: format!(
                        "El servicio de pronóstico devolvió el estado {}",
                        status
                    ),
                    field: None,
                },
            ),
            AppError::MalformedResponse(msg) => (
                StatusCode::BAD_GATEWAY,
                ErrorDetail {
                    code: "MALFORMED_RESPONSE".to_string(),
                    message_en: format!("Malformed forecast response: {}", msg),
                    message_es: format!("Respuesta de pronóstico malformada: {}", msg),
                    field: None,
                },
            ),
            AppError::StaleRefresh => (
                StatusCode::CONFLICT,
                ErrorDetail {
                    code: "STALE_REFRESH".to_string(),
                    message_en: "Refresh superseded by a newer one".to_string(),
                    message_es: "Actualización reemplazada por otra más reciente".to_string(),
                    field: None,
                },
            ),
            AppError::Validation {
                field,
                message,
                message_es,
            } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message_en: message.clone(),
                    message_es: message_es.clone(),
                    field: Some(field.clone()),
                },
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "NOT_FOUND".to_string(),
                    message_en: format!("{} not found", resource),
                    message_es: format!("No se encontró {}", resource),
                    field: None,
                },
            ),
            AppError::Configuration(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "CONFIGURATION_ERROR".to_string(),
                    message_en: format!("Configuration error: {}", msg),
                    message_es: format!("Error de configuración: {}", msg),
                    field: None,
                },
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message_en: msg.clone(),
                    message_es: "Error interno del servidor".to_string(),
                    field: None,
                },
            ),
            AppError::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message_en: "An internal server error occurred".to_string(),
                    message_es: "Error interno del servidor".to_string(),
                    field: None,
                },
            ),
        };

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
