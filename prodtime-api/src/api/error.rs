//! Error responses for calculation endpoints

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use prodtime_common::Error;
use serde_json::json;
use tracing::warn;

/// Calculation errors
///
/// Only structural snapshot problems reach this point; lesson-level
/// problems degrade to defaults inside the calculation.
#[derive(Debug)]
pub enum ApiError {
    /// Folder hierarchy contains a cycle
    Cycle(i64),
    /// Snapshot references a folder it does not contain
    UnknownReference(String),
    /// Snapshot is structurally invalid
    InvalidSnapshot(String),
    /// Anything else
    Internal(String),
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        match error {
            Error::CycleDetected(id) => ApiError::Cycle(id),
            Error::NotFound(what) => ApiError::UnknownReference(what),
            Error::InvalidInput(msg) => ApiError::InvalidSnapshot(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Cycle(id) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("Folder cycle detected at folder {}", id),
            ),
            ApiError::UnknownReference(what) => {
                (StatusCode::NOT_FOUND, format!("Not found: {}", what))
            }
            ApiError::InvalidSnapshot(msg) => {
                (StatusCode::BAD_REQUEST, format!("Invalid snapshot: {}", msg))
            }
            ApiError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, format!("Internal error: {}", msg))
            }
        };

        warn!("Rejected calculation request ({}): {}", status, message);

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
