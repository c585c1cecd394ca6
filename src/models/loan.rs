//! Loan model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::book_copy::BookCopy;
use super::user::UserShort;
use crate::error::{AppError, AppResult};

/// Loan with its book copy and borrower resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    pub id: i32,
    pub book_copy: BookCopy,
    pub user: UserShort,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// True while the loan is outstanding
    pub pending: bool,
}

/// Flat row produced by the loans/book_copies/users join
#[derive(Debug, Clone, FromRow)]
pub struct LoanRow {
    id: i32,
    start_date: NaiveDate,
    end_date: NaiveDate,
    pending: bool,
    book_copy_id: i32,
    book_copy_available: bool,
    book_copy_is_deleted: bool,
    user_id: i32,
    user_email: String,
    user_name: String,
    user_last_name: String,
}

impl From<LoanRow> for Loan {
    fn from(row: LoanRow) -> Self {
        Loan {
            id: row.id,
            book_copy: BookCopy {
                id: row.book_copy_id,
                available: row.book_copy_available,
                is_deleted: row.book_copy_is_deleted,
            },
            user: UserShort {
                id: row.user_id,
                email: row.user_email,
                name: row.user_name,
                last_name: row.user_last_name,
            },
            start_date: row.start_date,
            end_date: row.end_date,
            pending: row.pending,
        }
    }
}

/// Create loan request
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLoan {
    /// Book copy ID
    pub book_copy: i32,
    /// Borrower user ID
    pub user: i32,
    #[schema(value_type = String, format = Date, example = "2024-01-01")]
    pub start_date: NaiveDate,
    #[schema(value_type = String, format = Date, example = "2024-01-10")]
    pub end_date: NaiveDate,
}

/// Partial loan update; absent fields keep their stored value
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLoan {
    pub book_copy: Option<i32>,
    pub user: Option<i32>,
    #[schema(value_type = Option<String>, format = Date)]
    pub start_date: Option<NaiveDate>,
    #[schema(value_type = Option<String>, format = Date)]
    pub end_date: Option<NaiveDate>,
}

/// Resolved values for inserting a loan. Inserted loans are always pending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLoan {
    pub book_copy_id: i32,
    pub user_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Full replacement values for an existing loan's references and dates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanChanges {
    pub book_copy_id: i32,
    pub user_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// A loan must end strictly after it starts.
pub fn validate_date_range(start_date: NaiveDate, end_date: NaiveDate) -> AppResult<()> {
    if end_date <= start_date {
        return Err(AppError::BadRequest(
            "End date must be after start date".to_string(),
        ));
    }
    Ok(())
}
