use axum::{
    extract::multipart::{MultipartError, MultipartRejection},
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errors that escape a handler and become an HTTP error response
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid request body: {0}")]
    Body(#[from] JsonRejection),
    #[error("Invalid upload: {0}")]
    Upload(#[from] MultipartRejection),
    #[error("Invalid upload: {0}")]
    Multipart(#[from] MultipartError),
    #[error("Upload too large (max {max_mb}MB)")]
    PayloadTooLarge { max_mb: usize },
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) | ApiError::Body(_) | ApiError::Upload(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Multipart(e) => e.status(),
            ApiError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("{}", self);
        } else {
            log::warn!("{}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
