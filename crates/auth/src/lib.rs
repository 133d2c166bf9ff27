//! Credentials for the recipe API.
//!
//! This crate provides:
//! - Salted one-way password hashing and verification (argon2)
//! - Generation of opaque authentication token keys

mod error;
mod password;
mod token;

pub use error::*;
pub use password::*;
pub use token::*;

/// Minimum accepted password length, in characters.
pub const DEFAULT_PASSWORD_MIN_LENGTH: usize = 5;

/// Number of random bytes in a token key.
pub const TOKEN_KEY_BYTES: usize = 20;
