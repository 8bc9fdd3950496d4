//! Data endpoint management HTTP handlers.
//!
//! This module implements the endpoint-related API routes:
//! - POST /endpoints - register a new data endpoint
//! - GET /endpoints - list the caller's endpoints
//!
//! Both routes sit behind the bearer-token middleware; the resolved
//! caller arrives as an `AuthContext` extension.

use axum::{Extension, Json, extract::State, http::StatusCode};

use crate::error::AppError;
use crate::middleware::auth::AuthContext;
use crate::models::endpoint::{CreateEndpointRequest, EndpointResponse};
use crate::services::endpoint_service;
use crate::state::AppState;

/// Create a new data endpoint.
///
/// # Endpoint
///
/// `POST /endpoints`
///
/// # Request Body
///
/// ```json
/// {
///   "name": "Home weather",
///   "provider": "weather",
///   "config": { "api_key": "XYZ", "city": "Berlin" }
/// }
/// ```
///
/// # Response (201 Created)
///
/// Returns the created endpoint with the configuration echoed back.
/// The provider identifier is normalized to lowercase.
///
/// Unknown providers are accepted here; they fail only when data is
/// requested, which allows provisional configuration.
pub async fn create_endpoint(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(request): Json<CreateEndpointRequest>,
) -> Result<(StatusCode, Json<EndpointResponse>), AppError> {
    let endpoint = endpoint_service::create_endpoint(
        &state.pool,
        auth.user_id,
        &request.name,
        &request.provider,
        &request.config,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(endpoint.try_into()?)))
}

/// List all endpoints owned by the caller.
///
/// # Endpoint
///
/// `GET /endpoints`
///
/// # Response (200 OK)
///
/// Array of endpoints in insertion order (may be empty). Only the
/// caller's own endpoints are ever returned.
pub async fn list_endpoints(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Vec<EndpointResponse>>, AppError> {
    let endpoints = endpoint_service::list_endpoints(&state.pool, auth.user_id).await?;

    let responses = endpoints
        .into_iter()
        .map(EndpointResponse::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(responses))
}
