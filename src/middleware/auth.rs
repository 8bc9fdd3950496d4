//! Identity resolution middleware.
//!
//! Three independent credential schemes resolve a caller to a user:
//! 1. Bearer session token in the `Authorization` header (JSON API)
//! 2. Opaque API key in the `x-api-key` header (data fetch API)
//! 3. Session token in the `token` cookie (web UI)
//!
//! All three converge on one contract: produce an [`AuthContext`] or fail
//! `Unauthenticated`. Downstream authorization consumes only the resolved
//! identity, never the raw credential.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::user::User;
use crate::services::{token, user_service};
use crate::state::AppState;

/// Name of the cookie carrying the web session token.
pub const SESSION_COOKIE: &str = "token";

/// Resolved caller identity attached to authenticated requests.
///
/// Inserted into the request's extension map by the auth middleware and
/// extracted by route handlers with `Extension<AuthContext>`.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// ID of the authenticated user
    ///
    /// Used to scope database queries (e.g., only this user's endpoints)
    pub user_id: Uuid,

    /// Username of the authenticated user
    pub username: String,

    /// Whether the user may invoke admin-only operations
    pub is_admin: bool,
}

impl From<User> for AuthContext {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            username: user.username,
            is_admin: user.is_admin,
        }
    }
}

/// Bearer-token authentication middleware.
///
/// # Flow
///
/// 1. Extract `Authorization: Bearer <token>` header from the request
/// 2. Verify the token signature and expiry, yielding the subject
/// 3. Look the subject up in the database
/// 4. If found: inject [`AuthContext`], call next handler
/// 5. Any failure: 401 Unauthorized, with no hint which step failed
pub async fn bearer_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers()).ok_or(AppError::Unauthenticated)?;

    let context = resolve_session_token(&state, &token).await?;
    request.extensions_mut().insert(context);

    Ok(next.run(request).await)
}

/// API-key authentication middleware.
///
/// # Flow
///
/// 1. Extract the `x-api-key` header
/// 2. Hash the presented key and look the digest up in the database
/// 3. If found: inject [`AuthContext`], call next handler
/// 4. Missing or unknown key: 401 Unauthorized
pub async fn api_key_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let api_key = request
        .headers()
        .get("x-api-key")
        .and_then(|value| value.to_str().ok())
        .ok_or(AppError::Unauthenticated)?;

    let user = user_service::find_by_api_key(&state.pool, api_key)
        .await?
        .ok_or(AppError::Unauthenticated)?;

    request.extensions_mut().insert(AuthContext::from(user));

    Ok(next.run(request).await)
}

/// Resolve the caller from the web session cookie.
///
/// Same verify/resolve semantics as the bearer scheme; only the extraction
/// differs. Web handlers call this directly (instead of as middleware) so
/// they can degrade to a login redirect rather than a 401 body.
pub async fn resolve_cookie(state: &AppState, headers: &HeaderMap) -> Result<AuthContext, AppError> {
    let token = cookie_token(headers).ok_or(AppError::Unauthenticated)?;
    resolve_session_token(state, &token).await
}

/// Verify a session token and resolve its subject to a user.
///
/// Shared by the bearer and cookie schemes. A verified token whose subject
/// no longer exists fails exactly like an invalid token.
async fn resolve_session_token(state: &AppState, token: &str) -> Result<AuthContext, AppError> {
    let subject = token::verify(token, &state.config)?;

    let user = user_service::find_by_username(&state.pool, &subject)
        .await?
        .ok_or(AppError::Unauthenticated)?;

    Ok(AuthContext::from(user))
}

/// Extract the token from an `Authorization: Bearer <token>` header.
fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
}

/// Extract the session token from the `Cookie` header.
fn cookie_token(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;

    raw.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then(|| value.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_token_requires_bearer_prefix() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc.def.ghi"),
        );
        assert_eq!(bearer_token(&headers).as_deref(), Some("abc.def.ghi"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("abc.def.ghi"));
        assert_eq!(bearer_token(&headers), None);

        headers.remove(header::AUTHORIZATION);
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn cookie_token_finds_session_cookie_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; token=abc.def.ghi; lang=en"),
        );
        assert_eq!(cookie_token(&headers).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn cookie_token_ignores_other_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; nottoken=abc"),
        );
        assert_eq!(cookie_token(&headers), None);

        headers.remove(header::COOKIE);
        assert_eq!(cookie_token(&headers), None);
    }
}
