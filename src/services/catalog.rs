//! Catalog queries: members and books

use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{Book, Loan, MemberWithLoans},
    repository::LibraryStore,
};

#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn LibraryStore>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn LibraryStore>) -> Self {
        Self { store }
    }

    /// Members with their number of books currently borrowed
    pub async fn list_members(&self) -> AppResult<Vec<MemberWithLoans>> {
        self.store.list_members().await
    }

    pub async fn list_books(&self) -> AppResult<Vec<Book>> {
        self.store.list_books().await
    }

    /// Books with at least one copy on the shelf
    pub async fn list_available_books(&self) -> AppResult<Vec<Book>> {
        self.store.list_available_books().await
    }

    pub async fn count_open_loans(&self, member_code: &str) -> AppResult<i64> {
        self.store.count_open_loans(member_code).await
    }

    pub async fn find_open_loan(&self, member_code: &str, book_code: &str) -> AppResult<Option<Loan>> {
        self.store.find_open_loan(member_code, book_code).await
    }
}
