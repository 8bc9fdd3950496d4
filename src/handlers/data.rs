//! Universal data fetch handler.
//!
//! The single route real API consumers call in a loop: present an API key,
//! name an owned endpoint, get normalized provider data back.

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::auth::AuthContext;
use crate::models::endpoint::DataResponse;
use crate::services::{endpoint_service, provider_gateway};
use crate::state::AppState;

/// Fetch normalized provider data for an owned endpoint.
///
/// # Endpoint
///
/// `GET /api/universal/{id}` (authenticated via `x-api-key` header)
///
/// # Response (200 OK)
///
/// ```json
/// {
///   "endpoint_id": "550e8400-e29b-41d4-a716-446655440000",
///   "provider": "weather",
///   "data": {
///     "provider": "weather",
///     "synced_at": "2025-06-01T12:00:00+00:00",
///     "status": "demo",
///     "config_preview": { "api_key": "***", "city": "Berlin" }
///   }
/// }
/// ```
///
/// # Errors
///
/// - **401**: missing or unknown API key
/// - **404**: endpoint absent or owned by someone else (conflated)
/// - **400**: the endpoint's provider is not supported
pub async fn universal_data(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(endpoint_id): Path<Uuid>,
) -> Result<Json<DataResponse>, AppError> {
    let endpoint =
        endpoint_service::get_owned_endpoint(&state.pool, auth.user_id, endpoint_id).await?;

    let config = endpoint.config()?;
    let data = provider_gateway::fetch_provider_data(&endpoint.provider, &config)?;

    Ok(Json(DataResponse {
        endpoint_id: endpoint.id,
        provider: endpoint.provider,
        data,
    }))
}
