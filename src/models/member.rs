//! Member model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Member row from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Member {
    pub code: String,
    pub name: String,
    /// Unix timestamp (seconds) until which the member may not borrow
    pub penalty_until: Option<i64>,
}

impl Member {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            penalty_until: None,
        }
    }

    /// Whether a penalty is still running at `now`
    pub fn is_penalized(&self, now: i64) -> bool {
        self.penalty_until.map(|until| until > now).unwrap_or(false)
    }
}

/// Member with the number of books currently borrowed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct MemberWithLoans {
    pub code: String,
    pub name: String,
    pub penalty_until: Option<i64>,
    pub borrowed_books_count: i64,
}
