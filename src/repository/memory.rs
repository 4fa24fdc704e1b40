//! In-memory store
//!
//! Transactions hold the store lock for their whole lifetime and work on a
//! private copy of the state, which replaces the shared state on commit.

use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::{sample, LedgerTx, LibraryStore};
use crate::{
    error::{AppError, AppResult},
    models::{Book, Loan, Member, MemberWithLoans},
};

#[derive(Debug, Clone, Default)]
struct LibraryState {
    members: BTreeMap<String, Member>,
    books: BTreeMap<String, Book>,
    loans: Vec<Loan>,
}

impl LibraryState {
    fn count_open_loans(&self, member_code: &str) -> usize {
        self.loans
            .iter()
            .filter(|loan| loan.is_open() && loan.member_code == member_code)
            .count()
    }

    fn open_loan(&self, member_code: &str, book_code: &str) -> Option<&Loan> {
        self.loans
            .iter()
            .find(|loan| loan.is_open() && loan.member_code == member_code && loan.book_code == book_code)
    }

    fn push_loan(&mut self, member_code: &str, book_code: &str, borrowed_at: i64) -> Loan {
        let loan = Loan {
            id: self.loans.len() as i64 + 1,
            member_code: member_code.to_string(),
            book_code: book_code.to_string(),
            borrowed_at,
            returned_at: None,
        };
        self.loans.push(loan.clone());
        loan
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<LibraryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store preloaded with the sample members and books
    pub fn with_sample_data() -> Self {
        let mut state = LibraryState::default();
        for member in sample::members() {
            state.members.insert(member.code.clone(), member);
        }
        for book in sample::books() {
            state.books.insert(book.code.clone(), book);
        }
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub async fn insert_member(&self, member: Member) {
        self.state.lock().await.members.insert(member.code.clone(), member);
    }

    pub async fn insert_book(&self, book: Book) {
        self.state.lock().await.books.insert(book.code.clone(), book);
    }

    /// Record an open loan directly, without touching stock
    pub async fn insert_loan(&self, member_code: &str, book_code: &str, borrowed_at: i64) -> Loan {
        self.state.lock().await.push_loan(member_code, book_code, borrowed_at)
    }

    pub async fn member(&self, code: &str) -> Option<Member> {
        self.state.lock().await.members.get(code).cloned()
    }

    pub async fn book(&self, code: &str) -> Option<Book> {
        self.state.lock().await.books.get(code).cloned()
    }

    /// Every loan ever recorded, open or closed
    pub async fn loans(&self) -> Vec<Loan> {
        self.state.lock().await.loans.clone()
    }
}

#[async_trait]
impl LibraryStore for MemoryStore {
    async fn list_members(&self) -> AppResult<Vec<MemberWithLoans>> {
        let state = self.state.lock().await;
        let members = state
            .members
            .values()
            .map(|member| MemberWithLoans {
                code: member.code.clone(),
                name: member.name.clone(),
                penalty_until: member.penalty_until,
                borrowed_books_count: state.count_open_loans(&member.code) as i64,
            })
            .collect();
        Ok(members)
    }

    async fn list_books(&self) -> AppResult<Vec<Book>> {
        Ok(self.state.lock().await.books.values().cloned().collect())
    }

    async fn list_available_books(&self) -> AppResult<Vec<Book>> {
        let state = self.state.lock().await;
        let books = state.books.values().filter(|book| book.is_available()).cloned().collect();
        Ok(books)
    }

    async fn count_open_loans(&self, member_code: &str) -> AppResult<i64> {
        Ok(self.state.lock().await.count_open_loans(member_code) as i64)
    }

    async fn find_open_loan(&self, member_code: &str, book_code: &str) -> AppResult<Option<Loan>> {
        Ok(self.state.lock().await.open_loan(member_code, book_code).cloned())
    }

    async fn begin(&self) -> AppResult<Box<dyn LedgerTx>> {
        let guard = self.state.clone().lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(MemoryLedgerTx { guard, working }))
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

pub struct MemoryLedgerTx {
    guard: OwnedMutexGuard<LibraryState>,
    working: LibraryState,
}

#[async_trait]
impl LedgerTx for MemoryLedgerTx {
    async fn lock_member(&mut self, code: &str) -> AppResult<Option<Member>> {
        Ok(self.working.members.get(code).cloned())
    }

    async fn lock_book(&mut self, code: &str) -> AppResult<Option<Book>> {
        Ok(self.working.books.get(code).cloned())
    }

    async fn lock_open_loan(&mut self, member_code: &str, book_code: &str) -> AppResult<Option<Loan>> {
        Ok(self.working.open_loan(member_code, book_code).cloned())
    }

    async fn count_open_loans(&mut self, member_code: &str) -> AppResult<i64> {
        Ok(self.working.count_open_loans(member_code) as i64)
    }

    async fn adjust_stock(&mut self, book_code: &str, delta: i32) -> AppResult<()> {
        let book = self
            .working
            .books
            .get_mut(book_code)
            .ok_or_else(|| AppError::BookNotFound(book_code.to_string()))?;

        let stock = book
            .stock
            .checked_add(delta)
            .ok_or_else(|| AppError::Internal(format!("Stock of {} out of range", book_code)))?;
        if stock < 0 {
            return Err(AppError::Internal(format!("Stock of {} would become negative", book_code)));
        }
        book.stock = stock;
        Ok(())
    }

    async fn insert_loan(&mut self, member_code: &str, book_code: &str, borrowed_at: i64) -> AppResult<Loan> {
        Ok(self.working.push_loan(member_code, book_code, borrowed_at))
    }

    async fn close_loan(&mut self, loan_id: i64, returned_at: i64) -> AppResult<()> {
        if let Some(loan) = self
            .working
            .loans
            .iter_mut()
            .find(|loan| loan.id == loan_id && loan.is_open())
        {
            loan.returned_at = Some(returned_at);
        }
        Ok(())
    }

    async fn set_penalty_until(&mut self, member_code: &str, until: i64) -> AppResult<()> {
        if let Some(member) = self.working.members.get_mut(member_code) {
            member.penalty_until = Some(until);
        }
        Ok(())
    }

    async fn commit(&mut self) -> AppResult<()> {
        *self.guard = self.working.clone();
        Ok(())
    }
}
