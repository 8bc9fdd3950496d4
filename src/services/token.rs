//! Session token issuance and verification.
//!
//! Session tokens are HS256-signed JWTs carrying the username as subject
//! and an absolute expiry (now + configured window, default 12 hours).
//! There is no refresh mechanism and no revocation list: a leaked token
//! stays valid until it expires naturally.
//!
//! The signing secret comes exclusively from runtime configuration
//! (`APP_SECRET`); nothing is compiled in.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::AppError;

/// Claims embedded in every session token.
///
/// Deserialization fails when `sub` is absent, so a token with a missing
/// subject claim is rejected exactly like a tampered one.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject -- the username of the logged-in user.
    pub sub: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
}

/// Issue a signed session token for the given subject.
///
/// The expiry is absolute: `now + config.token_expiry_hours`.
pub fn issue(subject: &str, config: &Config) -> Result<String, AppError> {
    let expire = chrono::Utc::now().timestamp() + config.token_expiry_hours * 3600;

    let claims = Claims {
        sub: subject.to_string(),
        exp: expire,
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.app_secret.as_bytes()),
    )
    .map_err(|err| AppError::Internal(format!("token signing failed: {err}")))
}

/// Verify a session token and return its subject.
///
/// Every failure mode -- bad signature, malformed structure, past expiry,
/// missing subject claim -- collapses into `AppError::Unauthenticated`, so
/// callers cannot distinguish tamper from expiry.
pub fn verify(token: &str, config: &Config) -> Result<String, AppError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.app_secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )
    .map_err(|_| AppError::Unauthenticated)?;

    Ok(token_data.claims.sub)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper to build a test config with a known secret.
    fn test_config() -> Config {
        Config {
            database_url: "postgres://unused".to_string(),
            app_secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            server_port: 3000,
            token_expiry_hours: 12,
        }
    }

    #[test]
    fn issued_token_verifies_to_original_subject() {
        let config = test_config();
        let token = issue("alice", &config).expect("token issuance should succeed");

        let subject = verify(&token, &config).expect("fresh token should verify");
        assert_eq!(subject, "alice");
    }

    #[test]
    fn expired_token_fails_verification() {
        let config = test_config();

        // Manually create an already-expired token.
        // Use a margin well beyond the default 60-second leeway.
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: "alice".to_string(),
            exp: now - 300,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.app_secret.as_bytes()),
        )
        .expect("encoding should succeed");

        assert!(matches!(
            verify(&token, &config),
            Err(AppError::Unauthenticated)
        ));
    }

    #[test]
    fn token_signed_with_different_secret_fails() {
        let config_a = test_config();
        let mut config_b = test_config();
        config_b.app_secret = "a-completely-different-secret".to_string();

        let token = issue("alice", &config_a).expect("token issuance should succeed");

        assert!(matches!(
            verify(&token, &config_b),
            Err(AppError::Unauthenticated)
        ));
    }

    #[test]
    fn token_without_subject_claim_fails() {
        #[derive(Serialize)]
        struct SubjectlessClaims {
            exp: i64,
        }

        let config = test_config();
        let claims = SubjectlessClaims {
            exp: chrono::Utc::now().timestamp() + 3600,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.app_secret.as_bytes()),
        )
        .expect("encoding should succeed");

        // Missing `sub` is indistinguishable from tamper for callers.
        assert!(matches!(
            verify(&token, &config),
            Err(AppError::Unauthenticated)
        ));
    }

    #[test]
    fn garbage_token_fails() {
        let config = test_config();
        assert!(matches!(
            verify("not.a.jwt", &config),
            Err(AppError::Unauthenticated)
        ));
    }
}
