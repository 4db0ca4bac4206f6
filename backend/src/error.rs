//! Error handling for the Environmental Audit service
//!
//! External-service failures are normally absorbed by the fallback chains
//! and surfaced as advisories. Only request-level failures reach the client
//! through [`IntoResponse`].

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    #[error("Validation error: {0}")]
    ValidationError(String),

    // External service errors
    #[error("{service} is unreachable: {message}")]
    ServiceUnreachable {
        service: &'static str,
        message: String,
    },

    #[error("{service} returned {status}: {body}")]
    UpstreamStatus {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("{service} returned an unusable payload: {message}")]
    InvalidPayload {
        service: &'static str,
        message: String,
    },

    #[error("AI response rejected: {0}")]
    AiOutput(#[from] shared::AssessmentParseError),

    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl AppError {
    /// Classify a transport-level reqwest failure
    pub fn from_transport(service: &'static str, err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "request timed out".to_string()
        } else {
            err.to_string()
        };
        AppError::ServiceUnreachable { service, message }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation { .. } | AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::ServiceUnreachable { .. } => "SERVICE_UNREACHABLE",
            AppError::UpstreamStatus { .. } => "UPSTREAM_ERROR",
            AppError::InvalidPayload { .. } => "INVALID_UPSTREAM_PAYLOAD",
            AppError::AiOutput(_) => "AI_OUTPUT_REJECTED",
            AppError::NotConfigured(_) => "NOT_CONFIGURED",
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::ValidationError(errors.to_string())
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
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation { .. } | AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::ServiceUnreachable { .. } | AppError::NotConfigured(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::UpstreamStatus { .. }
            | AppError::InvalidPayload { .. }
            | AppError::AiOutput(_) => StatusCode::BAD_GATEWAY,
            AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = self.to_string();
        let field = match &self {
            AppError::Validation { field, .. } => Some(field.clone()),
            _ => None,
        };

        // Log the error for debugging
        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }

        let body = ErrorResponse {
            error: ErrorDetail {
                code: self.code().to_string(),
                message,
                field,
            },
        };
        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers and services
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::ValidationError("x".into()), StatusCode::BAD_REQUEST),
            (AppError::NotConfigured("Weather service"), StatusCode::SERVICE_UNAVAILABLE),
            (
                AppError::UpstreamStatus {
                    service: "Imagery service",
                    status: 500,
                    body: String::new(),
                },
                StatusCode::BAD_GATEWAY,
            ),
            (
                AppError::Configuration("ai.models is empty".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_ai_output_wraps_parse_error() {
        let err: AppError = shared::AssessmentParseError::NoJsonObject.into();
        assert_eq!(err.code(), "AI_OUTPUT_REJECTED");
        assert_eq!(err.to_string(), "AI response rejected: response contains no JSON object");
    }
}
