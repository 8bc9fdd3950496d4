//! Endpoint registry - ownership-scoped CRUD over data endpoints.
//!
//! Every query here filters by `owner_id`, so ownership isolation is
//! enforced in the database access itself rather than by checks layered
//! on top. A row that exists but belongs to someone else is
//! indistinguishable from a row that does not exist.

use serde_json::{Map, Value};
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::AppError;
use crate::models::endpoint::DataEndpoint;

/// Create a new data endpoint owned by the given user.
///
/// # Process
///
/// 1. Normalize the provider identifier to lowercase
/// 2. Serialize the configuration mapping to the opaque persisted form
/// 3. Insert in a single atomic statement
///
/// The provider is NOT validated against the registry here; creating an
/// endpoint for an unsupported provider succeeds and only fails later at
/// fetch time.
pub async fn create_endpoint(
    pool: &DbPool,
    owner_id: Uuid,
    name: &str,
    provider: &str,
    config: &Map<String, Value>,
) -> Result<DataEndpoint, AppError> {
    let provider = provider.to_lowercase();
    let config_json = serde_json::to_string(config)
        .map_err(|err| AppError::Internal(format!("endpoint config serialization failed: {err}")))?;

    let endpoint = sqlx::query_as::<_, DataEndpoint>(
        r#"
        INSERT INTO data_endpoints (owner_id, name, provider, config_json)
        VALUES ($1, $2, $3, $4)
        RETURNING id, owner_id, name, provider, config_json, created_at
        "#,
    )
    .bind(owner_id)
    .bind(name)
    .bind(&provider)
    .bind(&config_json)
    .fetch_one(pool)
    .await?;

    Ok(endpoint)
}

/// List every endpoint owned by the given user, in insertion order.
///
/// No pagination; the whole list is returned.
pub async fn list_endpoints(pool: &DbPool, owner_id: Uuid) -> Result<Vec<DataEndpoint>, AppError> {
    let endpoints = sqlx::query_as::<_, DataEndpoint>(
        r#"
        SELECT id, owner_id, name, provider, config_json, created_at
        FROM data_endpoints
        WHERE owner_id = $1
        ORDER BY created_at ASC
        "#,
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await?;

    Ok(endpoints)
}

/// Get a single endpoint by id, scoped to its owner.
///
/// # Security
///
/// The query filters by BOTH `id` AND `owner_id`. A missing row and a
/// foreign-owned row both surface as `EndpointNotFound`, preventing
/// existence enumeration across users.
pub async fn get_owned_endpoint(
    pool: &DbPool,
    owner_id: Uuid,
    endpoint_id: Uuid,
) -> Result<DataEndpoint, AppError> {
    let endpoint = sqlx::query_as::<_, DataEndpoint>(
        r#"
        SELECT id, owner_id, name, provider, config_json, created_at
        FROM data_endpoints
        WHERE id = $1 AND owner_id = $2
        "#,
    )
    .bind(endpoint_id)
    .bind(owner_id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::EndpointNotFound)?;

    Ok(endpoint)
}
