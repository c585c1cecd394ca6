//! Repository layer for database operations
//!
//! Each store is a trait so services can be exercised without PostgreSQL;
//! the `*Repository` structs are the sqlx implementations used in production.

pub mod book_copies;
pub mod loans;
#[cfg(test)]
pub mod memory;
pub mod roles;
pub mod users;

use std::sync::Arc;

use sqlx::{Pool, Postgres};

pub use book_copies::BookCopiesStore;
pub use loans::LoansStore;
pub use roles::RolesStore;
pub use users::UsersStore;

/// Main repository struct holding one handle per store
#[derive(Clone)]
pub struct Repository {
    pub roles: Arc<dyn RolesStore>,
    pub users: Arc<dyn UsersStore>,
    pub book_copies: Arc<dyn BookCopiesStore>,
    pub loans: Arc<dyn LoansStore>,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            roles: Arc::new(roles::RolesRepository::new(pool.clone())),
            users: Arc::new(users::UsersRepository::new(pool.clone())),
            book_copies: Arc::new(book_copies::BookCopiesRepository::new(pool.clone())),
            loans: Arc::new(loans::LoansRepository::new(pool)),
        }
    }

    /// Assemble a repository from arbitrary store implementations
    pub fn from_stores(
        roles: Arc<dyn RolesStore>,
        users: Arc<dyn UsersStore>,
        book_copies: Arc<dyn BookCopiesStore>,
        loans: Arc<dyn LoansStore>,
    ) -> Self {
        Self {
            roles,
            users,
            book_copies,
            loans,
        }
    }
}
