use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::submission::validator::ValidationError;

/// Shown for every rejected submission, whatever the cause, so that bots
/// learn nothing about which check tripped.
pub const INVALID_SUBMISSION: &str = "Invalid submission.";
pub const TOO_MANY_REQUESTS: &str = "Too many requests. Try again shortly.";
pub const PAYLOAD_TOO_LARGE: &str = "Submission too large.";

#[derive(Debug)]
pub enum AppError {
    Validation(ValidationError),
    /// Seconds until the caller may retry.
    RateLimited(u64),
    PayloadTooLarge,
    Database(sqlx::Error),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Validation(err) => write!(f, "Validation Error: {err}"),
            AppError::RateLimited(secs) => write!(f, "Rate Limited: retry after {secs}s"),
            AppError::PayloadTooLarge => write!(f, "Payload Too Large"),
            AppError::Database(err) => write!(f, "Database Error: {err}"),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(err) => {
                tracing::debug!("Rejected submission: {err}");
                error_body(StatusCode::BAD_REQUEST, INVALID_SUBMISSION)
            }
            AppError::RateLimited(retry_after) => {
                let mut response = error_body(StatusCode::TOO_MANY_REQUESTS, TOO_MANY_REQUESTS);
                response
                    .headers_mut()
                    .insert(header::RETRY_AFTER, retry_after.into());
                response
            }
            AppError::PayloadTooLarge => {
                tracing::debug!("Rejected oversized submission");
                error_body(StatusCode::PAYLOAD_TOO_LARGE, PAYLOAD_TOO_LARGE)
            }
            AppError::Database(err) => {
                tracing::error!("Database error: {err}");
                error_body(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

fn error_body(status: StatusCode, message: &str) -> Response {
    (status, axum::Json(json!({ "error": message }))).into_response()
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err)
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err)
    }
}
