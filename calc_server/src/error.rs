//! Thin `IntoResponse` wrapper around `CoreError`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use calc_core::CoreError;
use serde_json::json;

pub struct ApiError(pub CoreError);

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> ApiError {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            CoreError::MissingKey(_)
            | CoreError::Parse(_)
            | CoreError::DomainViolation(_)
            | CoreError::BuilderIncomplete(_)
            | CoreError::Evaluation(_) => StatusCode::BAD_REQUEST,
            CoreError::Io(_) | CoreError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}
