//! # Error Handling
//!
//! Maps domain errors to HTTP status codes and JSON error bodies so every
//! handler reports failures the same way.
//!
//! Unknown users are reported as a bare `400` with no body: callers learn that
//! a referenced user did not resolve, but not which one.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use slotsync_core::errors::TimeError;
use tracing::error;

/// Application error wrapper that provides HTTP status code mapping
///
/// `AppError` wraps a [`TimeError`] and implements `IntoResponse`, so handlers
/// can return `Result<_, AppError>` and use `?` on domain results.
#[derive(Debug)]
pub struct AppError(pub TimeError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            TimeError::UnknownUser(_) => return StatusCode::BAD_REQUEST.into_response(),
            TimeError::Validation(_) => StatusCode::BAD_REQUEST,
            TimeError::Database(_) => {
                error!("Request failed: {:?}", self.0);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let message = self.0.to_string();
        let body = Json(json!({ "error": message }));

        (status, body).into_response()
    }
}

/// Allows `?` on `TimeResult` inside handlers.
impl From<TimeError> for AppError {
    fn from(err: TimeError) -> Self {
        AppError(err)
    }
}

/// Store-level failures surface as database errors.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(TimeError::Database(err))
    }
}
