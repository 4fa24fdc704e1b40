//! Loan (borrowed book) model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Row of the borrowed_books table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Loan {
    pub id: i64,
    pub member_code: String,
    pub book_code: String,
    /// Unix timestamp (seconds)
    pub borrowed_at: i64,
    /// Unix timestamp (seconds), `None` while the book is still out
    pub returned_at: Option<i64>,
}

impl Loan {
    pub fn is_open(&self) -> bool {
        self.returned_at.is_none()
    }
}

/// Body of the borrow and return endpoints
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoanRequest {
    #[validate(length(min = 1, message = "memberCode must not be empty"))]
    pub member_code: String,
    #[validate(length(min = 1, message = "bookCode must not be empty"))]
    pub book_code: String,
}
