//! Error responses for HTTP handlers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use ertdrive_device::DeviceError;
use serde::Serialize;

/// JSON error body: `{"error": "..."}`.
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    /// Human-readable message (never contains wallet content)
    pub error: String,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            error: error.into(),
        }
    }
}

impl From<DeviceError> for ApiError {
    fn from(err: DeviceError) -> Self {
        match err {
            DeviceError::Enumeration { .. } => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to list drives: {err}"),
            ),
            DeviceError::Task(msg) => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Drive listing interrupted: {msg}"),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}
