//! API request bodies.
//!
//! Required string fields default to empty so that a missing field surfaces
//! as a field-level validation message rather than a body rejection. Unknown
//! fields (such as an attempted `user` override) are ignored.
//!
//! The `trimmed` methods strip surrounding whitespace from text fields.
//! Passwords are left as submitted.

use entities::Price;
use serde::{Deserialize, Serialize};

fn trim(value: String) -> String {
    value.trim().to_string()
}

// ============================================================================
// User Requests
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub name: String,
}

impl CreateUserRequest {
    pub fn trimmed(self) -> Self {
        Self {
            email: trim(self.email),
            name: trim(self.name),
            ..self
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl TokenRequest {
    pub fn trimmed(self) -> Self {
        Self {
            email: trim(self.email),
            ..self
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub password: Option<String>,
}

impl UpdateUserRequest {
    pub fn trimmed(self) -> Self {
        Self {
            name: self.name.map(trim),
            ..self
        }
    }
}

// ============================================================================
// Recipe Requests
// ============================================================================

/// A tag reference by name; resolves to the caller's tag of that name,
/// created on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagSpec {
    #[serde(default)]
    pub name: String,
}

impl TagSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn trimmed(self) -> Self {
        Self {
            name: trim(self.name),
        }
    }
}

/// Body for creating (`POST`), replacing (`PUT`) and patching (`PATCH`) a
/// recipe. Create and replace require `title`, `time_minutes` and `price`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipeRequest {
    pub title: Option<String>,
    pub time_minutes: Option<i32>,
    pub price: Option<Price>,
    pub link: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<TagSpec>>,
}

impl RecipeRequest {
    pub fn trimmed(self) -> Self {
        Self {
            title: self.title.map(trim),
            link: self.link.map(trim),
            description: self.description.map(trim),
            tags: self
                .tags
                .map(|tags| tags.into_iter().map(TagSpec::trimmed).collect()),
            ..self
        }
    }
}

// ============================================================================
// Tag Requests
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTagRequest {
    pub name: Option<String>,
}
