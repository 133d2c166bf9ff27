//! Authentication token entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An opaque credential bound to exactly one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthToken {
    /// Token key presented by clients.
    pub key: String,
    /// The user this token authenticates as.
    pub user_id: Uuid,
    /// When this token was issued.
    pub created_at: DateTime<Utc>,
}

impl AuthToken {
    /// Creates a new token for a user.
    pub fn new(key: impl Into<String>, user_id: Uuid) -> Self {
        Self {
            key: key.into(),
            user_id,
            created_at: Utc::now(),
        }
    }
}
