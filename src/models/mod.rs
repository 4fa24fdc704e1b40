//! Data models for the library

pub mod book;
pub mod loan;
pub mod member;

// Re-export commonly used types
pub use book::Book;
pub use loan::{Loan, LoanRequest};
pub use member::{Member, MemberWithLoans};
