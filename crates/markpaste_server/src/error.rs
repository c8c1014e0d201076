//! HTTP error mapping for API handlers.

use crate::AppError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Error returned by handlers, rendered as a JSON `{ "error": ... }` body.
#[derive(Debug)]
pub enum HttpError {
    App(AppError),
    PayloadTooLarge { limit: usize },
    /// A request the extractors refused before the handler ran.
    Rejected { status: StatusCode, message: String },
}

impl From<AppError> for HttpError {
    fn from(value: AppError) -> Self {
        Self::App(value)
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            HttpError::App(AppError::NotFound) => (StatusCode::NOT_FOUND, "Not found".to_string()),
            HttpError::PayloadTooLarge { limit } => (
                StatusCode::PAYLOAD_TOO_LARGE,
                format!("Paste size exceeds maximum of {} bytes", limit),
            ),
            HttpError::Rejected { status, message } => (status, message),
            HttpError::App(err @ (AppError::Database(_) | AppError::StorageMessage(_))) => {
                tracing::error!("Storage error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Storage error".to_string())
            }
            HttpError::App(err) => {
                tracing::error!("Internal error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
