use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errors surfaced by the board, the API and the CLI
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rejected query, filter or sort input
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Transport or protocol failure talking to a job board
    #[error("Network error: {0}")]
    Network(String),

    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// One job board failed during a load
    #[error("Source error ({source_name}): {message}")]
    Source { source_name: String, message: String },

    /// Every source failed and nothing was loaded
    #[error("Failed to load jobs: {0}")]
    LoadFailed(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Network(_) | AppError::Source { .. } => StatusCode::BAD_GATEWAY,
            AppError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            AppError::LoadFailed(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Stable code carried in the JSON error body
    pub fn error_code(&self) -> &str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::Network(_) => "NETWORK_ERROR",
            AppError::Timeout(_) => "TIMEOUT",
            AppError::Source { .. } => "SOURCE_ERROR",
            AppError::LoadFailed(_) => "LOAD_FAILED",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();
        let message = self.to_string();

        tracing::error!(
            error_code = error_code,
            status_code = status.as_u16(),
            message = %message,
            "Request error"
        );

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
                "status": status.as_u16(),
            }
        }));

        (status, body).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Configuration(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            AppError::NotFound("metrics".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Validation("salary range".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::LoadFailed("all sources failed".to_string()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::Source {
                source_name: "OpenAI".to_string(),
                message: "boom".to_string()
            }
            .status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(AppError::Timeout("fetch".to_string()).error_code(), "TIMEOUT");
        assert_eq!(AppError::LoadFailed(String::new()).error_code(), "LOAD_FAILED");
    }

    #[test]
    fn test_config_error_conversion() {
        let err = AppError::from(config::ConfigError::Message("no boards".to_string()));
        assert_eq!(err.error_code(), "CONFIGURATION_ERROR");
        assert_eq!(err.to_string(), "Configuration error: no boards");
    }

    #[test]
    fn test_source_error_display() {
        let err = AppError::Source {
            source_name: "Character".to_string(),
            message: "HTTP 503".to_string(),
        };
        assert_eq!(err.to_string(), "Source error (Character): HTTP 503");
    }
}
