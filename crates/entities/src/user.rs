//! User-related entity definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An account that owns recipes and tags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier.
    pub id: Uuid,
    /// Email address, with the domain part lowercased.
    pub email: String,
    /// Salted password hash in PHC string format.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Display name.
    pub name: String,
    /// Whether the account may authenticate.
    pub is_active: bool,
    /// Whether the account has staff access.
    pub is_staff: bool,
    /// Whether the account has every permission.
    pub is_superuser: bool,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
    /// When this record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new active, non-staff user.
    ///
    /// The email is normalized with [`normalize_email`]; the hash must already
    /// be computed by the caller.
    pub fn new(email: &str, password_hash: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: normalize_email(email),
            password_hash: password_hash.into(),
            name: String::new(),
            is_active: true,
            is_staff: false,
            is_superuser: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Grants staff and superuser flags.
    pub fn into_superuser(mut self) -> Self {
        self.is_staff = true;
        self.is_superuser = true;
        self
    }
}

/// Lowercases the domain part of an email address.
///
/// The address is split on the last `@`; the local part is kept verbatim.
/// Input without an `@` is returned unchanged.
pub fn normalize_email(email: &str) -> String {
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{}@{}", local, domain.to_lowercase()),
        None => email.to_string(),
    }
}
