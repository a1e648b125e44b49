use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use mongodb::error::{ErrorKind, WriteFailure};
use serde_json::json;
use thiserror::Error;

/// Every handler-level failure maps into one of these. Clients always get a
/// `{"message": ...}` body; storage and upstream details stay in the logs.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Not authorized, token is missing or invalid")]
    Unauthorized,

    // Duplicate save or registration.
    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    // User-safe message only; the raw failure is logged where it happened.
    #[error("{0}")]
    Upstream(String),

    #[error("Something went wrong on the server")]
    Database(#[from] mongodb::error::Error),

    #[error("Something went wrong on the server")]
    Internal(String),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            // duplicate saves are reported as 400 on the wire
            ApiError::BadRequest(_) | ApiError::Conflict(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream(_) | ApiError::Database(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Database(e) => tracing::error!("storage error: {e}"),
            ApiError::Internal(detail) => tracing::error!("internal error: {detail}"),
            _ => {}
        }

        (
            self.status_code(),
            Json(json!({ "message": self.to_string() })),
        )
            .into_response()
    }
}

/// Mongo duplicate key violation (code 11000). Shows up when a concurrent
/// insert beats the existence pre-check.
pub fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(&*err.kind, ErrorKind::Write(WriteFailure::WriteError(we)) if we.code == 11000)
}
