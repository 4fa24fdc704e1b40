//! Loan management service: borrowing and returning books

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    ledger::{BorrowCheck, Clock, LoanPolicy, ReturnOutcome},
    models::Loan,
    repository::LibraryStore,
};

#[derive(Clone)]
pub struct LoansService {
    store: Arc<dyn LibraryStore>,
    policy: LoanPolicy,
    clock: Arc<dyn Clock>,
}

impl LoansService {
    pub fn new(store: Arc<dyn LibraryStore>, policy: LoanPolicy, clock: Arc<dyn Clock>) -> Self {
        Self { store, policy, clock }
    }

    /// Lend one copy of a book to a member.
    ///
    /// Member and book rows are locked before any check, so the stock and
    /// the loan count cannot change under us before the writes land.
    pub async fn borrow_book(&self, member_code: &str, book_code: &str) -> AppResult<Loan> {
        let now = self.clock.now();
        let mut tx = self.store.begin().await?;

        let member = tx
            .lock_member(member_code)
            .await?
            .ok_or_else(|| AppError::MemberNotFound(member_code.to_string()))?;
        let open_loans = tx.count_open_loans(member_code).await?;
        let book = tx.lock_book(book_code).await?;
        let holds_same_book = tx.lock_open_loan(member_code, book_code).await?.is_some();

        let check = BorrowCheck {
            member: &member,
            book_code,
            book: book.as_ref(),
            open_loans,
            holds_same_book,
        };
        if let Err(e) = self.policy.check_borrow(&check, now) {
            tracing::info!("Borrow of {} by {} refused: {}", book_code, member_code, e);
            return Err(e);
        }

        tx.adjust_stock(book_code, -1).await?;
        let loan = tx.insert_loan(member_code, book_code, now).await?;
        tx.commit().await?;

        tracing::info!("Member {} borrowed {} (loan {})", member_code, book_code, loan.id);
        Ok(loan)
    }

    /// Take a book back, applying a penalty when it comes back late
    pub async fn return_book(&self, member_code: &str, book_code: &str) -> AppResult<ReturnOutcome> {
        let now = self.clock.now();
        let mut tx = self.store.begin().await?;

        let not_borrowed = || AppError::LoanNotFound {
            member_code: member_code.to_string(),
            book_code: book_code.to_string(),
        };

        tx.lock_member(member_code).await?.ok_or_else(not_borrowed)?;
        let loan = tx
            .lock_open_loan(member_code, book_code)
            .await?
            .ok_or_else(not_borrowed)?;
        // Only reached with a loan in hand; a vanished book aborts the return
        tx.lock_book(book_code)
            .await?
            .ok_or_else(|| AppError::BookNotFound(book_code.to_string()))?;

        let outcome = self.policy.assess_return(loan.borrowed_at, now);

        tx.close_loan(loan.id, outcome.returned_at).await?;
        tx.adjust_stock(book_code, 1).await?;
        if let Some(until) = outcome.penalty_until {
            tx.set_penalty_until(member_code, until).await?;
        }
        tx.commit().await?;

        if outcome.late {
            tracing::info!(
                "Member {} returned {} late, penalized until {}",
                member_code,
                book_code,
                outcome.penalty_until.unwrap_or_default()
            );
        } else {
            tracing::info!("Member {} returned {}", member_code, book_code);
        }

        Ok(outcome)
    }
}
