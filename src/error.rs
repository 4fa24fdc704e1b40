//! Error types for the library server

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Stable numeric error codes carried in error bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    DbFailure = 2,
    BadValue = 3,
    NoSuchMember = 4,
    NoSuchBook = 5,
    NoSuchLoan = 6,
    OutOfStock = 7,
    AlreadyBorrowed = 8,
    MaxBorrowsReached = 9,
    PenaltyActive = 10,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Member {0} not found")]
    MemberNotFound(String),

    #[error("This member is still in penalty time (until {until})")]
    PenaltyActive { member_code: String, until: i64 },

    #[error("Book {0} not found")]
    BookNotFound(String),

    #[error("The book {0} is out of stock")]
    OutOfStock(String),

    #[error("This member has already borrowed {limit} books")]
    BorrowLimitExceeded { member_code: String, limit: i64 },

    #[error("This member has already borrowed book {book_code}")]
    AlreadyBorrowed { member_code: String, book_code: String },

    #[error("This member has not borrowed book {book_code}")]
    LoanNotFound { member_code: String, book_code: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Numeric code and HTTP status for this error
    pub fn classify(&self) -> (StatusCode, ErrorCode) {
        match self {
            AppError::MemberNotFound(_) => (StatusCode::BAD_REQUEST, ErrorCode::NoSuchMember),
            AppError::PenaltyActive { .. } => (StatusCode::BAD_REQUEST, ErrorCode::PenaltyActive),
            AppError::BookNotFound(_) => (StatusCode::BAD_REQUEST, ErrorCode::NoSuchBook),
            AppError::OutOfStock(_) => (StatusCode::BAD_REQUEST, ErrorCode::OutOfStock),
            AppError::BorrowLimitExceeded { .. } => {
                (StatusCode::BAD_REQUEST, ErrorCode::MaxBorrowsReached)
            }
            AppError::AlreadyBorrowed { .. } => (StatusCode::BAD_REQUEST, ErrorCode::AlreadyBorrowed),
            AppError::LoanNotFound { .. } => (StatusCode::BAD_REQUEST, ErrorCode::NoSuchLoan),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, ErrorCode::BadValue),
            AppError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::DbFailure),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::Failure),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
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
        let (status, code) = self.classify();

        let message = match &self {
            AppError::Storage(e) => {
                tracing::error!("Database error: {:?}", e);
                "Database error".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
