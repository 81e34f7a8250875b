//! API Error Types
//!
//! Defines error types for the API layer and implements conversion
//! to HTTP responses with appropriate status codes.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::relay::RelayError;

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request validation failed; the message is shown to the user as-is
    #[error("{0}")]
    Validation(String),

    /// Body was not valid JSON for the endpoint
    #[error("Invalid request body: {0}")]
    Body(#[from] JsonRejection),

    /// Forwarding to the contact relay failed
    #[error("Failed to send issue report")]
    Relay(#[from] RelayError),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    pub request_id: String,
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ApiError::Body(rejection) => match rejection.status() {
                StatusCode::PAYLOAD_TOO_LARGE => (StatusCode::PAYLOAD_TOO_LARGE, "BODY_TOO_LARGE"),
                StatusCode::UNSUPPORTED_MEDIA_TYPE => {
                    (StatusCode::UNSUPPORTED_MEDIA_TYPE, "UNSUPPORTED_MEDIA_TYPE")
                }
                _ => (StatusCode::BAD_REQUEST, "INVALID_BODY"),
            },
            ApiError::Relay(e) => match e {
                // Pass the relay's own failure status through
                RelayError::Upstream { status, .. } => (
                    StatusCode::from_u16(*status)
                        .ok()
                        .filter(|s| s.is_client_error() || s.is_server_error())
                        .unwrap_or(StatusCode::BAD_GATEWAY),
                    "RELAY_ERROR",
                ),
                RelayError::Timeout => (StatusCode::GATEWAY_TIMEOUT, "RELAY_TIMEOUT"),
                _ => (StatusCode::BAD_GATEWAY, "RELAY_UNAVAILABLE"),
            },
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let request_id = uuid::Uuid::new_v4().to_string();

        let detail = match &self {
            ApiError::Relay(e) => e.to_string(),
            other => other.to_string(),
        };

        if status.is_server_error() {
            tracing::error!(
                request_id = %request_id,
                error_code = %code,
                error_message = %detail,
                "API error occurred"
            );
        } else {
            tracing::warn!(
                request_id = %request_id,
                error_code = %code,
                error_message = %detail,
                "Request rejected"
            );
        }

        let body = ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
            request_id,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;
