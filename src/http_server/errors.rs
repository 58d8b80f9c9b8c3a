//! # HTTP API Errors
//!
//! Every failure a handler can produce, and the status/body each one maps
//! to. Store failures are logged here and reach the client only as an
//! opaque 500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::observability::{log_event_with_fields, Event};
use crate::store::StoreError;

/// Result type for song handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// Song API errors
#[derive(Debug, Error)]
pub enum ApiError {
    // ==================
    // Client Errors
    // ==================
    /// Missing, malformed, empty or id-less body
    #[error("Invalid data")]
    InvalidData,

    /// GET of an absent business id
    #[error("Song with id {0} not found")]
    SongNotFound(i64),

    /// PUT or DELETE of an absent business id
    #[error("song not found")]
    NotFound,

    /// Empty collection on count or list
    #[error("No data available")]
    NoData,

    /// POST of a business id that already exists
    #[error("song with id {0} already present")]
    AlreadyPresent(String),

    /// Path that no route serves
    #[error("Not found")]
    RouteNotFound,

    // ==================
    // Server Errors
    // ==================
    /// Any store failure
    #[error("Something went wrong")]
    Store(#[from] StoreError),
}

impl ApiError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidData => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::SongNotFound(_)
            | ApiError::NotFound
            | ApiError::NoData
            | ApiError::RouteNotFound => StatusCode::NOT_FOUND,
            // Duplicate creates answer 302; clients rely on it as the conflict signal
            ApiError::AlreadyPresent(_) => StatusCode::FOUND,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// `{"message": ...}`
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// `{"error": ...}`
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// `{"Message": ...}`, the duplicate-create body
#[derive(Debug, Serialize)]
pub struct ConflictResponse {
    #[serde(rename = "Message")]
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let text = self.to_string();
        match self {
            ApiError::InvalidData | ApiError::SongNotFound(_) | ApiError::NotFound => {
                (status, Json(MessageResponse::new(text))).into_response()
            }
            ApiError::AlreadyPresent(_) => {
                (status, Json(ConflictResponse { message: text })).into_response()
            }
            ApiError::NoData | ApiError::RouteNotFound => {
                (status, Json(ErrorResponse { error: text })).into_response()
            }
            ApiError::Store(err) => {
                let detail = err.to_string();
                log_event_with_fields(Event::StoreError, &[("error", detail.as_str())]);
                (status, Json(ErrorResponse { error: text })).into_response()
            }
        }
    }
}
