//! Health check endpoint for service monitoring.

use axum::{Json, extract::State};
use serde::Serialize;

use crate::error::AppError;
use crate::services::provider_gateway;
use crate::state::AppState;

/// Health check response.
///
/// Reports liveness, database connectivity, and the supported providers.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall service status
    pub status: String,

    /// Database connection status
    pub database: String,

    /// Identifiers of all supported providers
    pub providers: Vec<&'static str>,
}

/// Health check handler.
///
/// # Response (200 OK)
///
/// ```json
/// {
///   "status": "ok",
///   "database": "connected",
///   "providers": ["webuntis", "imap", "caldav", "immich", "tesla", "cupra", "proxmox", "weather"]
/// }
/// ```
pub async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>, AppError> {
    // Verify database connectivity with a trivial query
    sqlx::query("SELECT 1").execute(&state.pool).await?;

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        database: "connected".to_string(),
        providers: provider_gateway::provider_names(),
    }))
}
