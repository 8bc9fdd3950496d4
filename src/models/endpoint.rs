//! Data endpoint models and API request/response types.
//!
//! A data endpoint is a named binding between a user and an external
//! provider, plus the opaque configuration that provider needs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::AppError;

/// Represents a data endpoint record from the database.
///
/// # Database Table
///
/// Maps to the `data_endpoints` table. Each endpoint:
/// - Belongs to exactly one user (via `owner_id`); never shared
/// - Stores its provider configuration as a serialized JSON text blob
///
/// # Ownership
///
/// Queries always filter by `owner_id` so one user can never read or
/// reference another user's endpoints.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DataEndpoint {
    /// Unique identifier for this endpoint
    pub id: Uuid,

    /// Foreign key to the user that owns this endpoint
    pub owner_id: Uuid,

    /// Human-readable display name
    pub name: String,

    /// Provider identifier, normalized to lowercase at creation
    pub provider: String,

    /// Provider configuration serialized as a JSON object string
    ///
    /// The schema of this blob is defined by the provider; this service
    /// stores and echoes it without validating its contents.
    pub config_json: String,

    /// Timestamp when this endpoint was created
    pub created_at: DateTime<Utc>,
}

impl DataEndpoint {
    /// Deserialize the stored configuration blob.
    ///
    /// The blob was serialized by this service at creation time, so a parse
    /// failure means the row was corrupted outside the application.
    pub fn config(&self) -> Result<Map<String, Value>, AppError> {
        serde_json::from_str(&self.config_json).map_err(|err| {
            AppError::Internal(format!("stored endpoint config is not valid JSON: {err}"))
        })
    }
}

/// Request body for `POST /endpoints`.
///
/// # JSON Example
///
/// ```json
/// {
///   "name": "Home weather",
///   "provider": "weather",
///   "config": { "api_key": "XYZ", "city": "Berlin" }
/// }
/// ```
///
/// # Validation
///
/// The provider is NOT checked against the registry here; unknown providers
/// are accepted at creation and only rejected when data is fetched.
#[derive(Debug, Deserialize)]
pub struct CreateEndpointRequest {
    pub name: String,

    pub provider: String,

    /// Opaque key/value configuration; defaults to an empty object
    #[serde(default)]
    pub config: Map<String, Value>,
}

/// Response body for endpoint creation and listing.
#[derive(Debug, Serialize)]
pub struct EndpointResponse {
    pub id: Uuid,
    pub name: String,
    pub provider: String,
    pub config: Map<String, Value>,
}

impl TryFrom<DataEndpoint> for EndpointResponse {
    type Error = AppError;

    fn try_from(endpoint: DataEndpoint) -> Result<Self, Self::Error> {
        let config = endpoint.config()?;
        Ok(Self {
            id: endpoint.id,
            name: endpoint.name,
            provider: endpoint.provider,
            config,
        })
    }
}

/// Response body for `GET /api/universal/{id}`.
///
/// # JSON Example
///
/// ```json
/// {
///   "endpoint_id": "550e8400-e29b-41d4-a716-446655440000",
///   "provider": "weather",
///   "data": {
///     "provider": "weather",
///     "status": "demo",
///     "config_preview": { "api_key": "***", "city": "Berlin" }
///   }
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse {
    pub endpoint_id: Uuid,
    pub provider: String,
    pub data: Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn endpoint_with_config(config_json: &str) -> DataEndpoint {
        DataEndpoint {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            name: "test".to_string(),
            provider: "weather".to_string(),
            config_json: config_json.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn config_parses_stored_json_object() {
        let endpoint = endpoint_with_config(r#"{"city":"Berlin"}"#);
        let config = endpoint.config().expect("valid blob should parse");
        assert_eq!(config.get("city"), Some(&json!("Berlin")));
    }

    #[test]
    fn corrupted_config_blob_is_an_internal_error() {
        let endpoint = endpoint_with_config("not json");
        assert!(matches!(endpoint.config(), Err(AppError::Internal(_))));
    }

    #[test]
    fn create_request_defaults_to_empty_config() {
        let request: CreateEndpointRequest =
            serde_json::from_value(json!({"name": "n", "provider": "imap"}))
                .expect("config should be optional");
        assert!(request.config.is_empty());
    }
}
