//! User model and related types

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::role::{Role, RoleType};

/// Internal row structure for user queries joined with their role
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    id: i32,
    email: String,
    password: String,
    name: String,
    last_name: String,
    is_deleted: bool,
    role_id: i32,
    role_name: RoleType,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            email: row.email,
            password: row.password,
            name: row.name,
            last_name: row.last_name,
            role: Role {
                id: row.role_id,
                name: row.role_name,
            },
            is_deleted: row.is_deleted,
        }
    }
}

/// Full user model from database
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    pub email: String,
    /// Hashed password (argon2)
    #[serde(skip_serializing)]
    pub password: String,
    pub name: String,
    pub last_name: String,
    pub role: Role,
    pub is_deleted: bool,
}

/// Short user representation embedded in loans
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserShort {
    pub id: i32,
    pub email: String,
    pub name: String,
    pub last_name: String,
}

impl From<&User> for UserShort {
    fn from(user: &User) -> Self {
        UserShort {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            last_name: user.last_name.clone(),
        }
    }
}

/// Sign-up request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignUp {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 100, message = "Last name is required"))]
    pub last_name: String,
}

/// Sign-in request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SignIn {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Values handed to the store when creating a user; the password is already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub last_name: String,
    pub role_id: i32,
}

/// JWT claims. The payload is the user's email, name and last name only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserClaims {
    pub email: String,
    pub name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub iat: i64,
    pub exp: i64,
}

impl UserClaims {
    /// Build claims for a user, valid for `ttl_hours` from now
    pub fn for_user(user: &User, ttl_hours: u64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            email: user.email.clone(),
            name: user.name.clone(),
            last_name: user.last_name.clone(),
            iat: now,
            exp: now + (ttl_hours as i64 * 3600),
        }
    }

    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse and verify a JWT token (signature and expiry)
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }
}

#[cfg(test)]
pub(crate) fn sample_user(id: i32, email: &str) -> User {
    User {
        id,
        email: email.to_string(),
        password: String::new(),
        name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        role: Role {
            id: 1,
            name: RoleType::User,
        },
        is_deleted: false,
    }
}
