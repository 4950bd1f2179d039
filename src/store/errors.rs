use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Error type for store handlers.
#[derive(Debug)]
pub enum StoreError {
    NotFound(String),
    Validation(String),
    Forbidden(String),
    Internal(String),
}

impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            StoreError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            StoreError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            StoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            StoreError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
