use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use postfinder::FinderError;

/// Error returned by every handler, rendered as `{"error": ..., "details": ...}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<String>,
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
            details: None,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
            details: self.details,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<FinderError> for ApiError {
    fn from(err: FinderError) -> Self {
        let (status, message) = match &err {
            FinderError::Validation(_) => (StatusCode::BAD_REQUEST, "Invalid request"),
            FinderError::NotFound(_) => (StatusCode::NOT_FOUND, "Not found"),
            FinderError::ExternalService(_) => (StatusCode::BAD_GATEWAY, "Geocoding unavailable"),
            FinderError::Dataset(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal error"),
        };
        if status.is_server_error() {
            tracing::error!("Request failed: {}", err);
        }
        Self {
            status,
            message: message.to_string(),
            details: Some(err.to_string()),
        }
    }
}
