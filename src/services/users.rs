//! User management service (credential hashing and user creation)

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::{
    error::{AppError, AppResult},
    models::{
        role::Role,
        user::{NewUser, SignUp, User},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
}

impl UsersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Hash the password and persist a new user with the given role
    pub async fn create_user(&self, request: SignUp, role: &Role) -> AppResult<User> {
        let password_hash = self.hash_password(&request.password)?;

        let user = NewUser {
            email: request.email.trim().to_lowercase(),
            password_hash,
            name: request.name,
            last_name: request.last_name,
            role_id: role.id,
        };

        self.repository.users.create(&user).await
    }

    /// Get an active (not soft-deleted) user by email
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.repository.users.find_by_email(email).await
    }

    /// Hash a password using Argon2
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }

    /// Verify a password against a stored hash (constant-time comparison)
    pub fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&user.password)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}
