//! Credential primitives: password hashing and API key material.
//!
//! Passwords are hashed with Argon2id (salted, memory-hard, tuned against
//! offline attacks). API keys are opaque 256-bit random strings; only their
//! SHA-256 digest is ever persisted, so the database never holds a usable
//! credential.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sha2::{Digest, Sha256};

use crate::error::AppError;

/// Hash a password with Argon2id and a fresh random salt.
///
/// The output is a self-describing PHC string (algorithm, parameters, salt,
/// digest), so verification needs no extra stored state.
///
/// Argon2 is CPU-intensive; callers on the async runtime should wrap this
/// in `spawn_blocking`.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| AppError::Internal(format!("password hashing failed: {err}")))?;

    Ok(hash.to_string())
}

/// Verify a password against a stored Argon2id hash.
///
/// Returns `false` for a wrong password AND for a malformed hash; it never
/// errors out, so callers get one uniform "credentials rejected" signal.
/// The comparison semantics inside the argon2 crate are constant-time.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(password_hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Generate a new opaque API key (32 random bytes, 64 hex chars).
///
/// The hex alphabet is URL-safe and the 256 bits of CSPRNG output make
/// collisions and guessing infeasible, so the key can serve as a long-lived
/// bearer capability.
pub fn generate_api_key() -> String {
    let bytes: [u8; 32] = rand::random();
    hex::encode(bytes)
}

/// Compute the SHA-256 hex digest of an API key.
///
/// Used both when persisting a freshly generated key and when looking up a
/// presented key, so plaintext keys are compared only by digest.
pub fn hash_api_key(api_key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(api_key.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_verifies_against_its_own_hash() {
        let hash = hash_password("correct horse battery").expect("hashing should succeed");
        assert!(verify_password("correct horse battery", &hash));
    }

    #[test]
    fn wrong_password_is_rejected() {
        let hash = hash_password("correct horse battery").expect("hashing should succeed");
        assert!(!verify_password("wrong horse battery", &hash));
    }

    #[test]
    fn same_password_hashes_differently_each_time() {
        // Fresh salt per call; equal hashes would mean salt reuse.
        let first = hash_password("hunter22222").expect("hashing should succeed");
        let second = hash_password("hunter22222").expect("hashing should succeed");
        assert_ne!(first, second);
    }

    #[test]
    fn malformed_hash_verifies_false_without_panicking() {
        assert!(!verify_password("anything", "not-a-phc-string"));
        assert!(!verify_password("anything", ""));
    }

    #[test]
    fn api_keys_are_64_hex_chars_and_unique() {
        let first = generate_api_key();
        let second = generate_api_key();

        assert_eq!(first.len(), 64);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(first, second, "two fresh keys must not collide");
    }

    #[test]
    fn api_key_digest_is_stable_and_hex() {
        let key = generate_api_key();

        let first = hash_api_key(&key);
        let second = hash_api_key(&key);
        assert_eq!(first, second, "digest of the same key must be stable");
        assert_eq!(first.len(), 64);

        // A different key must produce a different digest.
        assert_ne!(hash_api_key("other-key"), first);
    }
}
