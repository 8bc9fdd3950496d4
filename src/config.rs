//! Application configuration management.
//!
//! Configuration is loaded from environment variables with the `envy` crate,
//! which deserializes them into a type-safe struct. A `.env` file is loaded
//! first if present.

use serde::Deserialize;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `DATABASE_URL` (required): PostgreSQL connection string
/// - `APP_SECRET` (required): HMAC secret for signing session tokens.
///   There is deliberately no compiled-in default; startup fails without it.
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 3000
/// - `TOKEN_EXPIRY_HOURS` (optional): session token lifetime, defaults to 12
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,

    /// Secret used to sign and verify bearer session tokens (HS256).
    pub app_secret: String,

    #[serde(default = "default_port")]
    pub server_port: u16,

    #[serde(default = "default_token_expiry_hours")]
    pub token_expiry_hours: i64,
}

/// Default port if SERVER_PORT environment variable is not set.
fn default_port() -> u16 {
    3000
}

/// Default session token lifetime in hours.
fn default_token_expiry_hours() -> i64 {
    12
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required environment variables are missing (DATABASE_URL, APP_SECRET)
    /// - Environment variable values cannot be parsed into expected types
    /// - APP_SECRET is set but empty
    pub fn from_env() -> Result<Self, envy::Error> {
        // Try to load .env file if it exists (does nothing if not found)
        dotenvy::dotenv().ok();

        // Field names are automatically converted: app_secret -> APP_SECRET
        let config = envy::from_env::<Config>()?;

        // An empty secret would make every signed token forgeable
        if config.app_secret.is_empty() {
            return Err(envy::Error::Custom(
                "APP_SECRET must not be empty".to_string(),
            ));
        }

        Ok(config)
    }
}
