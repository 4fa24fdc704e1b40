//! Lending rules
//!
//! Pure decisions over state already loaded (and locked) by a store
//! transaction. The services layer feeds them and applies the outcome.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

use crate::{
    config::LoansConfig,
    error::{AppError, AppResult},
    models::{Book, Member},
};

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Source of the current time, in whole seconds since the Unix epoch
pub trait Clock: Send + Sync {
    fn now(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        Utc::now().timestamp()
    }
}

/// Clock that only moves when told to
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(now: i64) -> Self {
        Self { now: AtomicI64::new(now) }
    }

    pub fn set(&self, now: i64) {
        self.now.store(now, Ordering::SeqCst);
    }

    pub fn advance(&self, seconds: i64) {
        self.now.fetch_add(seconds, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Borrowing limits and penalty windows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoanPolicy {
    pub max_open_loans: i64,
    /// A return later than this many seconds after borrowing is late
    pub loan_period_secs: i64,
    /// How long a late return bars the member from borrowing
    pub penalty_secs: i64,
}

impl Default for LoanPolicy {
    fn default() -> Self {
        Self::from(&LoansConfig::default())
    }
}

impl From<&LoansConfig> for LoanPolicy {
    fn from(config: &LoansConfig) -> Self {
        Self {
            max_open_loans: config.max_open_loans,
            loan_period_secs: config.loan_period_days * SECONDS_PER_DAY,
            penalty_secs: config.penalty_days * SECONDS_PER_DAY,
        }
    }
}

/// Everything a borrow decision looks at
#[derive(Debug)]
pub struct BorrowCheck<'a> {
    pub member: &'a Member,
    pub book_code: &'a str,
    pub book: Option<&'a Book>,
    pub open_loans: i64,
    pub holds_same_book: bool,
}

/// Result of closing a loan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReturnOutcome {
    pub returned_at: i64,
    pub late: bool,
    /// Set when the return was late
    pub penalty_until: Option<i64>,
}

impl ReturnOutcome {
    pub fn message(&self) -> &'static str {
        if self.late {
            "Book returned with penalty"
        } else {
            "Book returned successfully"
        }
    }
}

impl LoanPolicy {
    /// Decide whether a borrow may proceed.
    ///
    /// Checks run in a fixed order: loan limit, penalty, book existence,
    /// stock, then the one-open-loan-per-book guard.
    pub fn check_borrow(&self, check: &BorrowCheck<'_>, now: i64) -> AppResult<()> {
        let member = check.member;

        if check.open_loans >= self.max_open_loans {
            return Err(AppError::BorrowLimitExceeded {
                member_code: member.code.clone(),
                limit: self.max_open_loans,
            });
        }

        if member.is_penalized(now) {
            return Err(AppError::PenaltyActive {
                member_code: member.code.clone(),
                until: member.penalty_until.unwrap_or_default(),
            });
        }

        let book = check
            .book
            .ok_or_else(|| AppError::BookNotFound(check.book_code.to_string()))?;

        if book.stock <= 0 {
            return Err(AppError::OutOfStock(book.code.clone()));
        }

        if check.holds_same_book {
            return Err(AppError::AlreadyBorrowed {
                member_code: member.code.clone(),
                book_code: book.code.clone(),
            });
        }

        Ok(())
    }

    /// Lateness and penalty for a loan returned at `now`
    pub fn assess_return(&self, borrowed_at: i64, now: i64) -> ReturnOutcome {
        let late = now - borrowed_at > self.loan_period_secs;

        ReturnOutcome {
            returned_at: now,
            late,
            penalty_until: late.then(|| now + self.penalty_secs),
        }
    }
}
