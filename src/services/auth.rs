//! Authentication service: sign-up, sign-in and token re-issue

use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::{
        role::RoleType,
        user::{SignIn, SignUp, User, UserClaims},
    },
    repository::Repository,
    services::users::UsersService,
};

/// User fields plus a freshly issued bearer token
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    #[serde(flatten)]
    pub user: User,
    pub token: String,
}

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    users: UsersService,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(repository: Repository, users: UsersService, config: AuthConfig) -> Self {
        Self {
            repository,
            users,
            config,
        }
    }

    /// Register a user with the default role and issue a token.
    ///
    /// Store errors propagate unchanged; a duplicate email is already a `BadRequest`.
    pub async fn sign_up(&self, request: SignUp) -> AppResult<AuthResponse> {
        let role = self
            .repository
            .roles
            .find_by_name(RoleType::User)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Role {} not found", RoleType::User)))?;

        let user = self.users.create_user(request, &role).await?;
        tracing::info!(user_id = user.id, "User signed up");

        let token = self.issue_token(&user)?;
        Ok(AuthResponse { user, token })
    }

    /// Verify credentials and issue a token
    pub async fn sign_in(&self, request: SignIn) -> AppResult<AuthResponse> {
        self.verify_credentials(&request)
            .await
            .map_err(handle_sign_in_error)
    }

    /// Re-issue a token for an already authenticated user
    pub fn check_auth_status(&self, user: User) -> AppResult<AuthResponse> {
        let token = self.issue_token(&user)?;
        Ok(AuthResponse { user, token })
    }

    /// Validate a bearer token and load its active user
    pub async fn authenticate_token(&self, token: &str) -> AppResult<User> {
        let claims = UserClaims::from_token(token, &self.config.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        self.users
            .find_by_email(&claims.email)
            .await?
            .ok_or_else(|| AppError::Authentication("Token not valid".to_string()))
    }

    async fn verify_credentials(&self, request: &SignIn) -> AppResult<AuthResponse> {
        let user = self
            .users
            .find_by_email(&request.email)
            .await?
            .ok_or_else(|| AppError::Authentication("Email not valid".to_string()))?;

        if !self.users.verify_password(&user, &request.password)? {
            tracing::warn!(user_id = user.id, "Rejected sign-in: wrong password");
            return Err(AppError::Authentication("Password is wrong".to_string()));
        }

        let token = self.issue_token(&user)?;
        Ok(AuthResponse { user, token })
    }

    fn issue_token(&self, user: &User) -> AppResult<String> {
        UserClaims::for_user(user, self.config.jwt_expiration_hours)
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }
}

/// Sign-in error policy: duplicates stay 400, credential failures stay 401,
/// everything else is logged here and surfaced as an opaque 500.
fn handle_sign_in_error(err: AppError) -> AppError {
    match err {
        AppError::BadRequest(detail) => AppError::BadRequest(detail),
        AppError::Authentication(msg) => AppError::Authentication(msg),
        other => {
            tracing::error!(error = %other, "Sign-in failed");
            AppError::Internal("Check server logs".to_string())
        }
    }
}
