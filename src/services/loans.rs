//! Loan lifecycle service
//!
//! A loan is created pending, may be returned once, and may be removed from
//! either state. The loan's book copy is marked unavailable on create and
//! available again on return; update and remove leave availability alone.

use crate::{
    error::{AppError, AppResult},
    models::{
        book_copy::BookCopy,
        loan::{validate_date_range, CreateLoan, Loan, LoanChanges, NewLoan, UpdateLoan},
        pagination::Pagination,
        user::User,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
}

impl LoansService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create a pending loan and mark its book copy unavailable
    pub async fn create(&self, request: CreateLoan) -> AppResult<Loan> {
        validate_date_range(request.start_date, request.end_date)?;

        let book_copy = self.find_book_copy(request.book_copy).await?;
        if !book_copy.available {
            return Err(AppError::BadRequest("Book copy is not available".to_string()));
        }

        let user = self.find_user(request.user).await?;

        let loan = self
            .repository
            .loans
            .insert_claiming_copy(&NewLoan {
                book_copy_id: book_copy.id,
                user_id: user.id,
                start_date: request.start_date,
                end_date: request.end_date,
            })
            .await?;

        tracing::info!(
            loan_id = loan.id,
            book_copy_id = book_copy.id,
            user_id = user.id,
            "Loan created"
        );
        Ok(loan)
    }

    /// List loans, one page at a time
    pub async fn find_all(&self, pagination: &Pagination) -> AppResult<Vec<Loan>> {
        self.repository
            .loans
            .list(pagination.limit(), pagination.offset())
            .await
    }

    /// Get a loan by ID
    pub async fn find_one(&self, id: i32) -> AppResult<Loan> {
        self.repository
            .loans
            .find(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Loan not found".to_string()))
    }

    /// Apply a partial update; omitted fields keep their stored values.
    ///
    /// Changing the book copy does not move availability between copies.
    pub async fn update(&self, id: i32, request: UpdateLoan) -> AppResult<Loan> {
        let book_copy = match request.book_copy {
            Some(book_copy_id) => Some(self.find_book_copy(book_copy_id).await?),
            None => None,
        };
        let user = match request.user {
            Some(user_id) => Some(self.find_user(user_id).await?),
            None => None,
        };

        let current = self.find_one(id).await?;

        let start_date = request.start_date.unwrap_or(current.start_date);
        let end_date = request.end_date.unwrap_or(current.end_date);
        validate_date_range(start_date, end_date)?;

        let changes = LoanChanges {
            book_copy_id: book_copy.map_or(current.book_copy.id, |c| c.id),
            user_id: user.map_or(current.user.id, |u| u.id),
            start_date,
            end_date,
        };

        self.repository.loans.update(id, &changes).await
    }

    /// Close a pending loan and make its book copy available again
    pub async fn return_loan(&self, id: i32) -> AppResult<Loan> {
        let loan = self.find_one(id).await?;
        if !loan.pending {
            return Err(AppError::BadRequest("Loan already returned".to_string()));
        }

        let returned = self
            .repository
            .loans
            .mark_returned(loan.id, loan.book_copy.id)
            .await?;

        tracing::info!(loan_id = id, book_copy_id = loan.book_copy.id, "Loan returned");
        Ok(returned)
    }

    /// Hard-delete a loan and return the deleted record
    pub async fn remove(&self, id: i32) -> AppResult<Loan> {
        let loan = self.find_one(id).await?;

        if !self.repository.loans.delete(id).await? {
            return Err(AppError::NotFound("Loan not found".to_string()));
        }

        if loan.pending {
            tracing::warn!(
                loan_id = id,
                book_copy_id = loan.book_copy.id,
                "Removed a pending loan; book copy stays unavailable"
            );
        } else {
            tracing::info!(loan_id = id, "Loan removed");
        }
        Ok(loan)
    }

    async fn find_book_copy(&self, id: i32) -> AppResult<BookCopy> {
        self.repository
            .book_copies
            .find_active(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Book copy not found".to_string()))
    }

    async fn find_user(&self, id: i32) -> AppResult<User> {
        self.repository
            .users
            .find_active(id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }
}
