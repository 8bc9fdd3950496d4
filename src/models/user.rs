//! User data models and API request/response types.
//!
//! This module defines:
//! - `User`: Database entity representing a registered account
//! - `RegisterRequest` / `RegisterResponse`: account creation types
//! - `LoginRequest` / `TokenResponse`: password login types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a user record from the database.
///
/// # Database Table
///
/// Maps to the `users` table. The `api_key_hash` column holds the SHA-256
/// digest of the user's API key; the key itself exists only in the
/// registration response and is never persisted.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Unique identifier for this user
    pub id: Uuid,

    /// Login name; globally unique, immutable identity key
    pub username: String,

    /// Argon2id hash of the password (PHC string format)
    pub password_hash: String,

    /// SHA-256 hex digest of the user's API key
    ///
    /// A presented key is hashed and compared against this column, so the
    /// plaintext key never touches the database.
    pub api_key_hash: String,

    /// Whether this user may invoke admin-only operations
    pub is_admin: bool,

    /// Timestamp when this user registered
    pub created_at: DateTime<Utc>,
}

/// Request body for `POST /register`.
///
/// # JSON Example
///
/// ```json
/// {
///   "username": "alice",
///   "password": "correct horse battery",
///   "is_admin": false
/// }
/// ```
///
/// # Validation
///
/// - `username`: required, must not already exist
/// - `password`: required, minimum 8 characters
/// - `is_admin`: optional, defaults to false
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,

    pub password: String,

    #[serde(default)]
    pub is_admin: bool,
}

/// Response body for `POST /register`.
///
/// The `api_key` is the plaintext capability credential and is shown only
/// here; afterwards the server retains just its digest.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub id: Uuid,
    pub username: String,
    pub api_key: String,
    pub is_admin: bool,
}

/// Request body for `POST /login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response body for `POST /login`.
///
/// # JSON Example
///
/// ```json
/// {
///   "access_token": "eyJhbGciOiJIUzI1NiJ9...",
///   "token_type": "bearer"
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}
