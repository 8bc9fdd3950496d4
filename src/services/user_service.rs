//! User service - registration and password authentication.
//!
//! This service owns the user lifecycle that exists today: creating an
//! account (hash password, mint API key, persist) and checking a
//! username/password pair at login. There is no delete or key rotation.

use tokio::task;

use crate::db::DbPool;
use crate::error::AppError;
use crate::models::user::{RegisterRequest, User};
use crate::services::credentials;

/// Create a new user account.
///
/// # Process
///
/// 1. Hash the password with Argon2id (on a blocking thread)
/// 2. Generate a fresh 256-bit API key and compute its digest
/// 3. Insert the row; the unique constraint on `username` catches races
///
/// # Returns
///
/// The created user together with the plaintext API key. This is the only
/// place the plaintext key ever exists; the caller must hand it to the
/// client immediately because it cannot be recovered later.
///
/// # Errors
///
/// - `UsernameTaken`: the username already exists
/// - `Internal`: password hashing failed
/// - `Database`: any other database error
pub async fn register_user(pool: &DbPool, request: RegisterRequest) -> Result<(User, String), AppError> {
    // Argon2 is CPU-bound; run it off the async runtime
    let password = request.password;
    let password_hash = task::spawn_blocking(move || credentials::hash_password(&password))
        .await
        .map_err(|err| AppError::Internal(format!("password hashing task panicked: {err}")))??;

    let api_key = credentials::generate_api_key();
    let api_key_hash = credentials::hash_api_key(&api_key);

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, password_hash, api_key_hash, is_admin)
        VALUES ($1, $2, $3, $4)
        RETURNING id, username, password_hash, api_key_hash, is_admin, created_at
        "#,
    )
    .bind(&request.username)
    .bind(&password_hash)
    .bind(&api_key_hash)
    .bind(request.is_admin)
    .fetch_one(pool)
    .await
    .map_err(|err| match &err {
        // The uniqueness constraint is the source of truth for duplicates;
        // no pre-check, so concurrent registrations cannot both succeed
        sqlx::Error::Database(db) if db.is_unique_violation() => AppError::UsernameTaken,
        _ => AppError::Database(err),
    })?;

    Ok((user, api_key))
}

/// Authenticate a username/password pair.
///
/// Unknown username and wrong password both fail `Unauthenticated`; the
/// caller learns nothing about which half was wrong.
pub async fn authenticate(
    pool: &DbPool,
    username: &str,
    password: &str,
) -> Result<User, AppError> {
    let user = find_by_username(pool, username)
        .await?
        .ok_or(AppError::Unauthenticated)?;

    // Verification is CPU-bound like hashing; keep it off the async runtime
    let password = password.to_string();
    let password_hash = user.password_hash.clone();
    let is_valid = task::spawn_blocking(move || credentials::verify_password(&password, &password_hash))
        .await
        .map_err(|err| AppError::Internal(format!("password verification task panicked: {err}")))?;

    if !is_valid {
        return Err(AppError::Unauthenticated);
    }

    Ok(user)
}

/// Look up a user by username.
pub async fn find_by_username(pool: &DbPool, username: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, password_hash, api_key_hash, is_admin, created_at
         FROM users
         WHERE username = $1",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Look up a user by a presented API key.
///
/// The key is hashed and compared against the stored digest; the plaintext
/// never participates in the query.
pub async fn find_by_api_key(pool: &DbPool, api_key: &str) -> Result<Option<User>, AppError> {
    let key_hash = credentials::hash_api_key(api_key);

    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, password_hash, api_key_hash, is_admin, created_at
         FROM users
         WHERE api_key_hash = $1",
    )
    .bind(&key_hash)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}
