//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Application-wide error type.
///
/// Each variant maps to a specific HTTP status code and error message.
///
/// # Error Categories
///
/// - **Database Errors**: Any sqlx::Error from database operations
/// - **Authentication Errors**: Missing, invalid, or expired credentials
/// - **Authorization Errors**: Admin-only operations invoked by non-admins
/// - **Resource Errors**: Resources absent or not owned by the caller
/// - **Validation Errors**: Invalid request data
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed (e.g., connection error, query error).
    ///
    /// This wraps any sqlx::Error using the `#[from]` attribute, which
    /// automatically implements `From<sqlx::Error> for AppError`.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Credential is missing, invalid, or expired.
    ///
    /// One uniform variant for every authentication failure mode (missing
    /// header, bad signature, expired token, unknown subject, wrong API
    /// key), so callers cannot distinguish which part failed.
    ///
    /// Returns HTTP 401 Unauthorized.
    #[error("Authentication required")]
    Unauthenticated,

    /// An admin-only operation was invoked by a non-admin user.
    ///
    /// Returns HTTP 403 Forbidden.
    #[error("Admin privileges required")]
    Forbidden,

    /// Requested endpoint does not exist or doesn't belong to the caller.
    ///
    /// The two cases are deliberately conflated so callers cannot probe for
    /// the existence of other users' endpoints.
    ///
    /// Returns HTTP 404 Not Found.
    #[error("Endpoint not found")]
    EndpointNotFound,

    /// Registration attempted with a username that is already taken.
    ///
    /// Returns HTTP 409 Conflict.
    #[error("Username already exists")]
    UsernameTaken,

    /// Request body or parameters are invalid.
    ///
    /// Returns HTTP 400 Bad Request.
    /// The String contains details about what was invalid.
    #[error("Invalid request")]
    InvalidInput(String),

    /// The endpoint's provider is not in the registry of known providers.
    ///
    /// Surfaced at data-fetch time, not at endpoint creation.
    ///
    /// Returns HTTP 400 Bad Request.
    #[error("Provider '{0}' is not supported")]
    UnsupportedProvider(String),

    /// Unexpected internal failure (hashing, token signing, subprocess).
    ///
    /// Returns HTTP 500 Internal Server Error (details hidden from client).
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convert AppError into an HTTP response.
///
/// This implementation allows Axum handlers to return `Result<T, AppError>`
/// and have errors automatically converted to proper HTTP responses.
///
/// # Response Format
///
/// All errors return JSON in this format:
/// ```json
/// {
///   "error": {
///     "code": "error_type",
///     "message": "Human-readable error message"
///   }
/// }
/// ```
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Map each error variant to (HTTP status, error code, message)
        let (status, code, message) = match self {
            AppError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                "unauthenticated",
                self.to_string(),
            ),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "forbidden", self.to_string()),
            AppError::EndpointNotFound => (StatusCode::NOT_FOUND, "not_found", self.to_string()),
            AppError::UsernameTaken => (StatusCode::CONFLICT, "conflict", self.to_string()),
            AppError::InvalidInput(ref msg) => {
                (StatusCode::BAD_REQUEST, "invalid_input", msg.clone())
            }
            AppError::UnsupportedProvider(_) => (
                StatusCode::BAD_REQUEST,
                "unsupported_provider",
                self.to_string(),
            ),
            // Never leak internal details (SQL, hash state, secrets) to clients
            AppError::Database(_) | AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "An internal error occurred".to_string(),
            ),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_variants_map_to_expected_status_codes() {
        let cases = [
            (AppError::Unauthenticated, StatusCode::UNAUTHORIZED),
            (AppError::Forbidden, StatusCode::FORBIDDEN),
            (AppError::EndpointNotFound, StatusCode::NOT_FOUND),
            (AppError::UsernameTaken, StatusCode::CONFLICT),
            (
                AppError::InvalidInput("bad".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::UnsupportedProvider("nope".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::Internal("boom".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn internal_errors_hide_details_from_clients() {
        let response = AppError::Internal("argon2 parameter error".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        // The message itself is only in the Display impl, never serialized;
        // the body carries a generic message instead.
    }

    #[test]
    fn unsupported_provider_message_names_the_provider_only() {
        let message = AppError::UnsupportedProvider("smartfridge".to_string()).to_string();
        assert_eq!(message, "Provider 'smartfridge' is not supported");
    }
}
