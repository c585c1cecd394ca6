//! Loans repository for database operations
//!
//! Writes that touch both a loan and its book copy run inside a single
//! transaction so the copy's `available` flag never disagrees with the loan
//! that was just written.

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::loan::{Loan, LoanChanges, LoanRow, NewLoan},
};

const LOAN_SELECT: &str = r#"
    SELECT l.id, l.start_date, l.end_date, l.pending,
           b.id AS book_copy_id, b.available AS book_copy_available,
           b.is_deleted AS book_copy_is_deleted,
           u.id AS user_id, u.email AS user_email, u.name AS user_name,
           u.last_name AS user_last_name
    FROM loans l
    JOIN book_copies b ON b.id = l.book_copy_id
    JOIN users u ON u.id = l.user_id
"#;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoansStore: Send + Sync {
    /// Page through loans ordered by ID
    async fn list(&self, limit: i64, offset: i64) -> AppResult<Vec<Loan>>;

    /// Get a loan by ID
    async fn find(&self, id: i32) -> AppResult<Option<Loan>>;

    /// Mark the copy unavailable and insert a pending loan, atomically.
    ///
    /// Fails with `BadRequest` if the copy is no longer available.
    async fn insert_claiming_copy(&self, loan: &NewLoan) -> AppResult<Loan>;

    /// Overwrite a loan's references and dates. Copy availability is untouched.
    async fn update(&self, id: i32, changes: &LoanChanges) -> AppResult<Loan>;

    /// Clear `pending` and release the copy, atomically.
    ///
    /// Fails with `NotFound` if the loan is gone and `BadRequest` if it was
    /// already returned.
    async fn mark_returned(&self, id: i32, book_copy_id: i32) -> AppResult<Loan>;

    /// Hard-delete a loan. Returns false if no row matched.
    async fn delete(&self, id: i32) -> AppResult<bool>;
}

#[derive(Clone)]
pub struct LoansRepository {
    pool: Pool<Postgres>,
}

impl LoansRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LoansStore for LoansRepository {
    async fn list(&self, limit: i64, offset: i64) -> AppResult<Vec<Loan>> {
        let rows = sqlx::query_as::<_, LoanRow>(&format!(
            "{LOAN_SELECT} ORDER BY l.id LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Loan::from).collect())
    }

    async fn find(&self, id: i32) -> AppResult<Option<Loan>> {
        let row = sqlx::query_as::<_, LoanRow>(&format!("{LOAN_SELECT} WHERE l.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Loan::from))
    }

    async fn insert_claiming_copy(&self, loan: &NewLoan) -> AppResult<Loan> {
        let mut tx = self.pool.begin().await?;

        // Conditional update: only one concurrent request can flip the flag
        let claimed = sqlx::query(
            "UPDATE book_copies SET available = FALSE WHERE id = $1 AND available AND NOT is_deleted",
        )
        .bind(loan.book_copy_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if claimed == 0 {
            // Dropping `tx` rolls back
            return Err(AppError::BadRequest("Book copy is not available".to_string()));
        }

        let loan_id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO loans (book_copy_id, user_id, start_date, end_date, pending)
            VALUES ($1, $2, $3, $4, TRUE)
            RETURNING id
            "#,
        )
        .bind(loan.book_copy_id)
        .bind(loan.user_id)
        .bind(loan.start_date)
        .bind(loan.end_date)
        .fetch_one(&mut *tx)
        .await?;

        let row = sqlx::query_as::<_, LoanRow>(&format!("{LOAN_SELECT} WHERE l.id = $1"))
            .bind(loan_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(row.into())
    }

    async fn update(&self, id: i32, changes: &LoanChanges) -> AppResult<Loan> {
        let updated = sqlx::query(
            r#"
            UPDATE loans
            SET book_copy_id = $2, user_id = $3, start_date = $4, end_date = $5
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(changes.book_copy_id)
        .bind(changes.user_id)
        .bind(changes.start_date)
        .bind(changes.end_date)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if updated == 0 {
            return Err(AppError::NotFound("Loan not found".to_string()));
        }

        self.find(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Loan not found".to_string()))
    }

    async fn mark_returned(&self, id: i32, book_copy_id: i32) -> AppResult<Loan> {
        let mut tx = self.pool.begin().await?;

        let pending: Option<bool> =
            sqlx::query_scalar("SELECT pending FROM loans WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        match pending {
            None => return Err(AppError::NotFound("Loan not found".to_string())),
            Some(false) => return Err(AppError::BadRequest("Loan already returned".to_string())),
            Some(true) => {}
        }

        sqlx::query("UPDATE loans SET pending = FALSE WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE book_copies SET available = TRUE WHERE id = $1")
            .bind(book_copy_id)
            .execute(&mut *tx)
            .await?;

        let row = sqlx::query_as::<_, LoanRow>(&format!("{LOAN_SELECT} WHERE l.id = $1"))
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(row.into())
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let deleted = sqlx::query("DELETE FROM loans WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }
}
