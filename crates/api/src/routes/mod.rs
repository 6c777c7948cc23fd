//! API route definitions.

use axum::{Json, Router, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::AppState;
use trickle_shared::AppError;

pub mod consumptions;
pub mod expenses;
pub mod health;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(expenses::routes())
        .merge(consumptions::routes())
}

/// Renders an `AppError` as a JSON error response.
///
/// Storage failures get an opaque body; their detail stays in the logs.
pub(crate) fn error_response(error: &AppError) -> axum::response::Response {
    let status =
        StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let message = match error {
        AppError::Database(_) | AppError::Internal(_) => "An error occurred".to_string(),
        other => other.to_string(),
    };

    (
        status,
        Json(json!({
            "error": error.error_code().to_lowercase(),
            "message": message
        })),
    )
        .into_response()
}

/// Opaque 500 response for failures the caller cannot act on.
pub(crate) fn internal_error() -> axum::response::Response {
    error_response(&AppError::Internal("unexpected failure".to_string()))
}
