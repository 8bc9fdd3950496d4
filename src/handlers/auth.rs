//! Registration and login HTTP handlers.
//!
//! This module implements the unauthenticated account endpoints:
//! - POST /register - create a user account
//! - POST /login - exchange username/password for a bearer session token

use axum::{Json, extract::State, http::StatusCode};

use crate::error::AppError;
use crate::models::user::{LoginRequest, RegisterRequest, RegisterResponse, TokenResponse};
use crate::services::{token, user_service};
use crate::state::AppState;

/// Minimum password length enforced at the input-validation boundary.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Register a new user account.
///
/// # Endpoint
///
/// `POST /register`
///
/// # Request Body
///
/// ```json
/// {
///   "username": "alice",
///   "password": "correct horse battery"
/// }
/// ```
///
/// # Response (201 Created)
///
/// ```json
/// {
///   "id": "550e8400-e29b-41d4-a716-446655440000",
///   "username": "alice",
///   "api_key": "9f2c...64 hex chars...",
///   "is_admin": false
/// }
/// ```
///
/// The `api_key` is shown exactly once. Only its digest is stored, so it
/// cannot be retrieved again later.
///
/// # Errors
///
/// - **400**: password shorter than 8 characters
/// - **409**: username already exists
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    if request.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::InvalidInput(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    let (user, api_key) = user_service::register_user(&state.pool, request).await?;

    tracing::info!(username = %user.username, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            id: user.id,
            username: user.username,
            api_key,
            is_admin: user.is_admin,
        }),
    ))
}

/// Log in with username and password.
///
/// # Endpoint
///
/// `POST /login`
///
/// # Response (200 OK)
///
/// ```json
/// {
///   "access_token": "eyJhbGciOiJIUzI1NiJ9...",
///   "token_type": "bearer"
/// }
/// ```
///
/// The token expires after the configured window (default 12 hours);
/// there is no refresh or revocation.
///
/// # Errors
///
/// - **401**: unknown username or wrong password (indistinguishable)
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let user = user_service::authenticate(&state.pool, &request.username, &request.password).await?;

    let access_token = token::issue(&user.username, &state.config)?;

    Ok(Json(TokenResponse::bearer(access_token)))
}
