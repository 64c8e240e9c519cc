use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

use songvault_core::StoreError;

pub type AppResult<T> = Result<T, AppError>;

/// Client-facing message for a song id that matches no row.
pub const SONG_NOT_FOUND: &str = "Song not found.";

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Map a store failure to a response. Storage failures are logged in
    /// full and answered with `failure`, so no database detail reaches the
    /// client.
    pub fn from_store(err: StoreError, failure: &str) -> Self {
        match err {
            StoreError::BadRequest(message) => Self::bad_request(message),
            StoreError::NotFound(id) => {
                tracing::debug!(song_id = %id, "song not found");
                Self::not_found(SONG_NOT_FOUND)
            }
            other => {
                tracing::error!(error = %other, "{failure}");
                Self::internal(failure)
            }
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": {
                "message": self.message,
                "status": self.status.as_u16(),
            }
        }));

        (self.status, body).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        Self::from_store(err, "Storage operation failed.")
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        tracing::debug!(error = %err, "rejecting malformed multipart body");
        Self::new(err.status(), err.body_text())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        tracing::error!(error = %err, "staging I/O failed");
        Self::internal("Failed to save songs.")
    }
}
