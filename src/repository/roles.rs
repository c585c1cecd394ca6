//! Roles repository

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::role::{Role, RoleType},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RolesStore: Send + Sync {
    /// Look up a role by its unique name
    async fn find_by_name(&self, name: RoleType) -> AppResult<Option<Role>>;
}

#[derive(Clone)]
pub struct RolesRepository {
    pool: Pool<Postgres>,
}

impl RolesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RolesStore for RolesRepository {
    async fn find_by_name(&self, name: RoleType) -> AppResult<Option<Role>> {
        let role = sqlx::query_as::<_, Role>("SELECT id, name FROM roles WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(role)
    }
}
