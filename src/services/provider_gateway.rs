//! Provider gateway - connector stub over a fixed provider registry.
//!
//! This is the seam where real provider integrations plug in. Today it
//! performs no network I/O: every supported provider returns a canned demo
//! payload that echoes the endpoint configuration with secret-bearing
//! values masked. A real connector replaces the payload body per provider
//! but MUST preserve the redaction contract -- configuration echoed back
//! to the caller never contains secrets, error paths included.

use serde_json::{Map, Value, json};

use crate::error::AppError;

/// Replacement string for redacted configuration values.
const MASK: &str = "***";

/// Key substrings that mark a configuration value as secret.
const SECRET_MARKERS: [&str; 4] = ["pass", "token", "secret", "key"];

/// The fixed registry of known providers: identifier and human-readable
/// description. The set is configuration, not architecture; adding a
/// provider means adding a row here and a real connector behind it.
pub const SUPPORTED_PROVIDERS: &[(&str, &str)] = &[
    ("webuntis", "Timetables / school info"),
    ("imap", "E-mail retrieval"),
    ("caldav", "Calendar data"),
    ("immich", "Photos & albums"),
    ("tesla", "Tesla vehicle status"),
    ("cupra", "Cupra vehicle status"),
    ("proxmox", "Server / cluster data"),
    ("weather", "Weather information"),
];

/// Whether the given (already lowercased) provider identifier is known.
pub fn is_supported(provider: &str) -> bool {
    SUPPORTED_PROVIDERS.iter().any(|(name, _)| *name == provider)
}

/// The identifiers of all known providers, for /health and the dashboard.
pub fn provider_names() -> Vec<&'static str> {
    SUPPORTED_PROVIDERS.iter().map(|(name, _)| *name).collect()
}

/// Fetch normalized data for a provider (stub).
///
/// # Payload
///
/// ```json
/// {
///   "provider": "weather",
///   "synced_at": "2025-06-01T12:00:00+00:00",
///   "status": "demo",
///   "hint": "Connector skeleton active. Real provider integrations plug in here.",
///   "config_preview": { "api_key": "***", "city": "Berlin" }
/// }
/// ```
///
/// # Errors
///
/// `UnsupportedProvider` when the identifier is not in the registry. The
/// error message names the provider only -- never the configuration.
pub fn fetch_provider_data(
    provider: &str,
    config: &Map<String, Value>,
) -> Result<Value, AppError> {
    let provider = provider.to_lowercase();
    if !is_supported(&provider) {
        return Err(AppError::UnsupportedProvider(provider));
    }

    Ok(json!({
        "provider": provider,
        "synced_at": chrono::Utc::now().to_rfc3339(),
        "status": "demo",
        "hint": "Connector skeleton active. Real provider integrations plug in here.",
        "config_preview": redact_config(config),
    }))
}

/// Mask secret-bearing values in a configuration mapping.
///
/// A value is masked when its key contains any of the secret markers
/// (case-insensitive substring match); all other values pass through
/// unmodified.
pub fn redact_config(config: &Map<String, Value>) -> Map<String, Value> {
    config
        .iter()
        .map(|(key, value)| {
            let lowered = key.to_lowercase();
            if SECRET_MARKERS.iter().any(|marker| lowered.contains(marker)) {
                (key.clone(), Value::String(MASK.to_string()))
            } else {
                (key.clone(), value.clone())
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config(pairs: &[(&str, &str)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), Value::String((*v).to_string())))
            .collect()
    }

    #[test]
    fn registry_has_eight_lowercase_providers() {
        assert_eq!(SUPPORTED_PROVIDERS.len(), 8);
        for (name, description) in SUPPORTED_PROVIDERS {
            assert_eq!(*name, name.to_lowercase());
            assert!(!description.is_empty());
        }
    }

    #[test]
    fn weather_fetch_masks_api_key_and_passes_city_through() {
        let config = config(&[("api_key", "XYZ"), ("city", "Berlin")]);

        let data = fetch_provider_data("weather", &config).expect("weather is supported");
        let preview = &data["config_preview"];

        assert_eq!(data["provider"], "weather");
        assert_eq!(data["status"], "demo");
        assert_eq!(preview["api_key"], "***");
        assert_eq!(preview["city"], "Berlin");
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let result = fetch_provider_data("unknown_provider", &Map::new());
        assert!(matches!(
            result,
            Err(AppError::UnsupportedProvider(name)) if name == "unknown_provider"
        ));
    }

    #[test]
    fn provider_lookup_is_case_insensitive() {
        let data = fetch_provider_data("Weather", &Map::new()).expect("case must not matter");
        assert_eq!(data["provider"], "weather");
    }

    #[test]
    fn redaction_matches_secret_markers_case_insensitively() {
        let config = config(&[
            ("Password", "hunter2"),
            ("AUTH_TOKEN", "t0k3n"),
            ("client_secret", "shh"),
            ("ApiKey", "XYZ"),
            ("host", "example.com"),
            ("port", "993"),
        ]);

        let redacted = redact_config(&config);

        assert_eq!(redacted["Password"], "***");
        assert_eq!(redacted["AUTH_TOKEN"], "***");
        assert_eq!(redacted["client_secret"], "***");
        assert_eq!(redacted["ApiKey"], "***");
        assert_eq!(redacted["host"], "example.com");
        assert_eq!(redacted["port"], "993");
    }

    #[test]
    fn non_string_secret_values_are_masked_too() {
        let mut config = Map::new();
        config.insert("pin_key".to_string(), json!(1234));
        config.insert("retries".to_string(), json!(3));

        let redacted = redact_config(&config);

        assert_eq!(redacted["pin_key"], "***");
        assert_eq!(redacted["retries"], 3);
    }
}
