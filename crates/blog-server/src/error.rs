//! Mapping of failures onto HTTP responses.

use crate::dto::ErrorResponse;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use blog_core::CoreError;
use tracing::error;

/// Error returned by handlers.
#[derive(Debug)]
pub enum AppError {
    /// The request itself is malformed.
    BadRequest(String),
    /// A service call failed.
    Core(CoreError),
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            Self::Core(err) => {
                let status = match err {
                    CoreError::NotFound { .. } => StatusCode::NOT_FOUND,
                    CoreError::Validation(_) => StatusCode::BAD_REQUEST,
                    CoreError::Storage(_) | CoreError::Internal(_) => {
                        error!(error = %err, "Request failed");
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                (status, err.to_string())
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        Self::Core(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}
