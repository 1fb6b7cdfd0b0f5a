//! # Credentials
//!
//! Password hashing (Argon2id, PHC string format) and session token
//! generation.
//!
//! ```text
//! password ──► argon2(random salt) ──► "$argon2id$v=19$..."  (stored)
//! 96 random bytes ──► base64 url-safe ──► 128-char token     (stored, sent)
//! ```

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use rand::Rng;
use tracing::error;

const TOKEN_BYTES: usize = 96;

/// Hashes `password` with a fresh salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let mut salt = [0u8; 16];
    rand::rng().fill(&mut salt);
    let salt = SaltString::encode_b64(&salt)?;

    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

/// Checks `password` against a stored PHC hash.
///
/// An unparsable hash verifies as false.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            error!(error = %e, "Stored password hash is not a valid PHC string");
            false
        }
    }
}

/// A new opaque session token.
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill(&mut bytes[..]);
    URL_SAFE.encode(bytes)
}
