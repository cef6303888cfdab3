//! Error types for the Liber server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Stable numeric codes carried in API error responses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Success = 0,
    Failure = 1,
    NoSuchPatron = 2,
    NoSuchItem = 3,
    ItemNotAvailable = 4,
    Duplicate = 5,
    NotBorrowed = 6,
    BadRecord = 7,
    StorageFailure = 8,
    BadValue = 9,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Duplicate identifier: {0}")]
    DuplicateIdentifier(String),

    #[error("Patron not found: {0}")]
    PatronNotFound(i32),

    #[error("Item not found: {0}")]
    ItemNotFound(String),

    #[error("Item {0} is not available")]
    ItemUnavailable(i32),

    #[error("Item {item_id} is not borrowed by patron {patron_id}")]
    NotBorrowedByPatron {
        patron_id: i32,
        item_id: i32,
        /// True when the item is out on loan to a different patron,
        /// false when it is not borrowed at all.
        held_by_other: bool,
    },

    #[error("Corrupt {stream} record: {details}")]
    CorruptRecord {
        stream: &'static str,
        details: String,
    },

    #[error("Persistence failed: {0}")]
    PersistenceFailed(#[source] std::io::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::DuplicateIdentifier(_) => (StatusCode::CONFLICT, ErrorCode::Duplicate),
            AppError::PatronNotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NoSuchPatron),
            AppError::ItemNotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NoSuchItem),
            AppError::ItemUnavailable(_) => (StatusCode::CONFLICT, ErrorCode::ItemNotAvailable),
            AppError::NotBorrowedByPatron { .. } => (StatusCode::CONFLICT, ErrorCode::NotBorrowed),
            AppError::CorruptRecord { .. } => {
                tracing::error!("Corrupt record: {}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::BadRecord)
            }
            AppError::PersistenceFailed(e) => {
                tracing::error!("Persistence failed: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::StorageFailure)
            }
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, ErrorCode::BadValue),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::Failure)
            }
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
