//! Authentication endpoints

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::{
    error::AppResult,
    models::user::{SignIn, SignUp},
    services::auth::AuthResponse,
    AppState,
};

use super::AuthenticatedUser;

/// Register a new account
#[utoipa::path(
    post,
    path = "/auth/signup",
    tag = "auth",
    request_body = SignUp,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Invalid input or email already registered")
    )
)]
pub async fn sign_up(
    State(state): State<AppState>,
    Json(request): Json<SignUp>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    request.validate()?;

    let response = state.services.auth.sign_up(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Sign in with email and password
#[utoipa::path(
    post,
    path = "/auth/signin",
    tag = "auth",
    request_body = SignIn,
    responses(
        (status = 200, description = "Signed in", body = AuthResponse),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn sign_in(
    State(state): State<AppState>,
    Json(request): Json<SignIn>,
) -> AppResult<Json<AuthResponse>> {
    request.validate()?;

    let response = state.services.auth.sign_in(request).await?;
    Ok(Json(response))
}

/// Re-issue a token for the current session
#[utoipa::path(
    get,
    path = "/auth/check-status",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Session is valid", body = AuthResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn check_status(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> AppResult<Json<AuthResponse>> {
    let response = state.services.auth.check_auth_status(user)?;
    Ok(Json(response))
}
