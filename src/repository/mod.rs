//! Repository layer for database operations
//!
//! Services never talk to a connection directly: they receive an
//! `Arc<dyn LibraryStore>` and open a [`LedgerTx`] for every state change.

pub mod memory;
pub mod postgres;
pub mod sample;

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    config::{AppConfig, StoreBackend},
    error::AppResult,
    models::{Book, Loan, Member, MemberWithLoans},
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Read queries and transaction entry point of a library store
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LibraryStore: Send + Sync {
    /// All members with their count of open loans, ordered by code
    async fn list_members(&self) -> AppResult<Vec<MemberWithLoans>>;

    /// All books, ordered by code
    async fn list_books(&self) -> AppResult<Vec<Book>>;

    /// Books with at least one copy on the shelf, ordered by code
    async fn list_available_books(&self) -> AppResult<Vec<Book>>;

    async fn count_open_loans(&self, member_code: &str) -> AppResult<i64>;

    async fn find_open_loan(&self, member_code: &str, book_code: &str) -> AppResult<Option<Loan>>;

    /// Start a transaction. Dropping it without `commit` discards every change.
    async fn begin(&self) -> AppResult<Box<dyn LedgerTx>>;

    /// Check that the store answers queries
    async fn ping(&self) -> AppResult<()>;
}

/// One atomic unit of work over members, books and loans.
///
/// `lock_*` methods read a row and keep it locked until the transaction
/// ends, so checks made on the returned values still hold when the
/// writes are applied.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerTx: Send {
    async fn lock_member(&mut self, code: &str) -> AppResult<Option<Member>>;

    async fn lock_book(&mut self, code: &str) -> AppResult<Option<Book>>;

    async fn lock_open_loan(&mut self, member_code: &str, book_code: &str) -> AppResult<Option<Loan>>;

    async fn count_open_loans(&mut self, member_code: &str) -> AppResult<i64>;

    /// Add `delta` to a book's stock
    async fn adjust_stock(&mut self, book_code: &str, delta: i32) -> AppResult<()>;

    async fn insert_loan(&mut self, member_code: &str, book_code: &str, borrowed_at: i64) -> AppResult<Loan>;

    async fn close_loan(&mut self, loan_id: i64, returned_at: i64) -> AppResult<()>;

    async fn set_penalty_until(&mut self, member_code: &str, until: i64) -> AppResult<()>;

    async fn commit(&mut self) -> AppResult<()>;
}

/// Build the store selected by configuration
pub async fn connect(config: &AppConfig) -> AppResult<Arc<dyn LibraryStore>> {
    match config.database.backend {
        StoreBackend::Postgres => {
            let store = PgStore::connect(&config.database).await?;
            store.migrate().await?;
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store, data is lost on shutdown");
            Ok(Arc::new(MemoryStore::with_sample_data()))
        }
    }
}
