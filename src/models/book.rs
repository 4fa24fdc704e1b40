//! Book model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Book row from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub code: String,
    pub title: String,
    /// Copies currently on the shelf
    pub stock: i32,
}

impl Book {
    pub fn new(code: impl Into<String>, title: impl Into<String>, stock: i32) -> Self {
        Self {
            code: code.into(),
            title: title.into(),
            stock,
        }
    }

    pub fn is_available(&self) -> bool {
        self.stock > 0
    }
}
