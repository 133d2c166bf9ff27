//! Password hashing and verification.

use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use password_hash::{PasswordHash, SaltString};
use rand::Rng;

use crate::AuthResult;

/// Length of the random salt in bytes.
const SALT_BYTES: usize = 16;

/// Hashes a password with argon2id and a fresh random salt.
///
/// The result is a self-describing PHC string (algorithm, parameters, salt
/// and digest) suitable for storage.
pub fn hash_password(password: &str) -> AuthResult<String> {
    let mut rng = rand::rng();
    let salt_bytes: Vec<u8> = (0..SALT_BYTES).map(|_| rng.random::<u8>()).collect();
    let salt = SaltString::encode_b64(&salt_bytes)?;

    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Checks a plaintext password against a stored PHC hash.
///
/// Returns false for a mismatch and for a hash that cannot be parsed.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!(error = %e, "Stored password hash is not a valid PHC string");
            false
        }
    }
}
