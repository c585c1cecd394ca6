//! Book copies repository

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{error::AppResult, models::book_copy::BookCopy};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookCopiesStore: Send + Sync {
    /// Get a book copy by ID, ignoring soft-deleted copies
    async fn find_active(&self, id: i32) -> AppResult<Option<BookCopy>>;
}

#[derive(Clone)]
pub struct BookCopiesRepository {
    pool: Pool<Postgres>,
}

impl BookCopiesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookCopiesStore for BookCopiesRepository {
    async fn find_active(&self, id: i32) -> AppResult<Option<BookCopy>> {
        let copy = sqlx::query_as::<_, BookCopy>(
            "SELECT id, available, is_deleted FROM book_copies WHERE id = $1 AND NOT is_deleted",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(copy)
    }
}
