//! Book copy model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// A loanable physical copy of a catalog title.
///
/// `available` is false exactly while a pending loan holds the copy. Only the
/// loan service writes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookCopy {
    pub id: i32,
    pub available: bool,
    pub is_deleted: bool,
}
