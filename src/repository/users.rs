//! Users repository for database operations

use async_trait::async_trait;
use sqlx::{postgres::PgDatabaseError, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::user::{NewUser, User, UserRow},
};

const USER_SELECT: &str = r#"
    SELECT u.id, u.email, u.password, u.name, u.last_name, u.is_deleted,
           r.id AS role_id, r.name AS role_name
    FROM users u
    JOIN roles r ON r.id = u.role_id
"#;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersStore: Send + Sync {
    /// Get a user by ID, ignoring soft-deleted users
    async fn find_active(&self, id: i32) -> AppResult<Option<User>>;

    /// Get a user by email, ignoring soft-deleted users
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Insert a user. A duplicate email fails with `AppError::BadRequest`.
    async fn create(&self, user: &NewUser) -> AppResult<User>;
}

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UsersStore for UsersRepository {
    async fn find_active(&self, id: i32) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "{USER_SELECT} WHERE u.id = $1 AND NOT u.is_deleted"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "{USER_SELECT} WHERE LOWER(u.email) = LOWER($1) AND NOT u.is_deleted"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn create(&self, user: &NewUser) -> AppResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            WITH inserted AS (
                INSERT INTO users (email, password, name, last_name, role_id)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING *
            )
            SELECT i.id, i.email, i.password, i.name, i.last_name, i.is_deleted,
                   r.id AS role_id, r.name AS role_name
            FROM inserted i
            JOIN roles r ON r.id = i.role_id
            "#,
        )
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.name)
        .bind(&user.last_name)
        .bind(user.role_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(row.into())
    }
}

/// Turn a unique-key violation into a `BadRequest` carrying the database detail
/// (e.g. `Key (email)=(a@b.c) already exists.`).
fn map_unique_violation(err: sqlx::Error) -> AppError {
    if let Some(db_err) = err.as_database_error() {
        if db_err.is_unique_violation() {
            let detail = db_err
                .try_downcast_ref::<PgDatabaseError>()
                .and_then(|pg| pg.detail())
                .unwrap_or_else(|| db_err.message())
                .to_string();
            return AppError::BadRequest(detail);
        }
    }
    AppError::Database(err)
}
