//! Storage for the recipe API.
//!
//! This crate provides a storage abstraction for users, authentication
//! tokens, recipes and tags. Every recipe and tag query is scoped to an
//! owning user. Two backends are available: an in-memory store (for tests and
//! throwaway instances) and SQLite.

mod error;
mod memory;
mod schema;
mod sqlite;
mod traits;

pub use error::*;
pub use memory::*;
pub use sqlite::*;
pub use traits::*;
