//! Opaque token key generation.

use rand::Rng;

use crate::TOKEN_KEY_BYTES;

/// Generates a random token key as lowercase hex.
pub fn generate_token_key() -> String {
    let mut bytes = [0u8; TOKEN_KEY_BYTES];
    rand::rng().fill(&mut bytes[..]);
    hex::encode(bytes)
}
