//! HTTP protocol definitions for the recipe API
//!
//! This crate defines the JSON bodies exchanged between the recipe server
//! and its clients, along with the error envelope every failure uses.

mod error;
pub mod requests;
pub mod responses;

pub use error::*;
