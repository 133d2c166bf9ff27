//! Tag entity definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A label owned by a user that can be attached to that user's recipes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Store-assigned identifier.
    pub id: i64,
    /// Owning user.
    pub user_id: Uuid,
    /// Tag name, unique per owner.
    pub name: String,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
}

impl Tag {
    /// Returns true if this tag belongs to the given user.
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}
