//! Business logic shared by the API handlers.

pub mod accounts;
pub mod recipes;
