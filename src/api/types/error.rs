//! API error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Error body returned by every endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: String,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ApiErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            response: ApiErrorResponse {
                error: message.into(),
            },
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }

    pub fn gateway_timeout(message: impl Into<String>) -> Self {
        Self::new(StatusCode::GATEWAY_TIMEOUT, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match &err {
            DomainError::InvalidImage { .. } | DomainError::Validation { .. } => {
                Self::bad_request(err.to_string())
            }
            DomainError::NotFound { message } => Self::not_found(message),
            DomainError::Timeout { .. } => Self::gateway_timeout(err.to_string()),
            DomainError::NotLoaded { .. } | DomainError::ModelLoad { .. } => {
                Self::unavailable(err.to_string())
            }
            DomainError::Inference { .. }
            | DomainError::Configuration { .. }
            | DomainError::Internal { .. } => {
                tracing::error!(error = %err, "Request failed");
                Self::internal(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_image_is_bad_request() {
        let error: ApiError = DomainError::invalid_image("truncated PNG").into();
        assert_eq!(error.status, StatusCode::BAD_REQUEST);
        assert_eq!(error.response.error, "Invalid image: truncated PNG");
    }

    #[test]
    fn test_not_found_keeps_message() {
        let error: ApiError = DomainError::not_found("Crop 'kale' not found in database").into();
        assert_eq!(error.status, StatusCode::NOT_FOUND);
        assert_eq!(error.response.error, "Crop 'kale' not found in database");
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (DomainError::validation("bad"), StatusCode::BAD_REQUEST),
            (DomainError::timeout(10), StatusCode::GATEWAY_TIMEOUT),
            (DomainError::not_loaded("disease"), StatusCode::SERVICE_UNAVAILABLE),
            (DomainError::inference("boom"), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (domain, status) in cases {
            assert_eq!(ApiError::from(domain).status, status);
        }
    }

    #[test]
    fn test_error_body_serialization() {
        let json = serde_json::to_value(ApiError::bad_request("No file uploaded").response).unwrap();
        assert_eq!(json, serde_json::json!({"error": "No file uploaded"}));
    }
}
