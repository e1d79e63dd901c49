//! API error types and JSON error responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use crate::db::{LyricsRepoError, TrackRepoError};

/// API errors that can be returned to clients.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Requested data was not found: {0}")]
    NotFound(String),

    #[error("Lyrics document is empty, nothing to upload")]
    EmptyDocument,

    #[error("No synchronized lyric lines recognized ({rejected} lines skipped)")]
    NothingParsed { rejected: usize },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::EmptyDocument => StatusCode::BAD_REQUEST,
            ApiError::NothingParsed { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<TrackRepoError> for ApiError {
    fn from(err: TrackRepoError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<LyricsRepoError> for ApiError {
    fn from(err: LyricsRepoError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

/// JSON error body: `{"error": {"code": ..., "message": ...}}`.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Serialize)]
struct ErrorDetail {
    code: u16,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("request failed: {}", self);
        }
        let body = Json(ErrorBody {
            error: ErrorDetail {
                code: status.as_u16(),
                message: self.to_string(),
            },
        });
        (status, body).into_response()
    }
}
