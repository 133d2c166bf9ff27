//! Core entity definitions for the recipe API.
//!
//! This crate defines the data types shared by the store, the auth layer and
//! the HTTP server: users and their tokens, recipes, tags and prices.

mod price;
mod recipe;
mod tag;
mod token;
mod user;

pub use price::*;
pub use recipe::*;
pub use tag::*;
pub use token::*;
pub use user::*;
