//! Data models for Bibliotheca

pub mod book_copy;
pub mod loan;
pub mod pagination;
pub mod role;
pub mod user;

// Re-export commonly used types
pub use book_copy::BookCopy;
pub use loan::{CreateLoan, Loan, UpdateLoan};
pub use pagination::Pagination;
pub use role::{Role, RoleType};
pub use user::{User, UserClaims, UserShort};
