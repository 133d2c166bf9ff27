//! SQLite schema and row mappings.

use chrono::{DateTime, Utc};
use entities::{AuthToken, Price, Recipe, Tag, User};
use sqlx::FromRow;
use uuid::Uuid;

use crate::{StoreError, StoreResult};

/// Schema applied on connect. Every statement is idempotent.
pub(crate) const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    name TEXT NOT NULL DEFAULT '',
    is_active INTEGER NOT NULL DEFAULT 1,
    is_staff INTEGER NOT NULL DEFAULT 0,
    is_superuser INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS auth_tokens (
    key TEXT PRIMARY KEY,
    user_id TEXT NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS recipes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    title TEXT NOT NULL,
    time_minutes INTEGER NOT NULL,
    price_cents INTEGER NOT NULL,
    link TEXT NOT NULL DEFAULT '',
    description TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_recipes_user_id ON recipes (user_id);

CREATE TABLE IF NOT EXISTS tags (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    created_at TEXT NOT NULL,
    UNIQUE (user_id, name)
);

CREATE TABLE IF NOT EXISTS recipe_tags (
    recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
    tag_id INTEGER NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
    PRIMARY KEY (recipe_id, tag_id)
);
"#;

fn parse_timestamp(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

pub(crate) fn parse_uuid(value: &str) -> StoreResult<Uuid> {
    value
        .parse()
        .map_err(|_| StoreError::InvalidData(format!("invalid uuid: {}", value)))
}

/// Database row for User
#[derive(Debug, FromRow)]
pub(crate) struct UserRow {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<UserRow> for User {
    type Error = StoreError;

    fn try_from(row: UserRow) -> StoreResult<Self> {
        Ok(User {
            id: parse_uuid(&row.id)?,
            email: row.email,
            password_hash: row.password_hash,
            name: row.name,
            is_active: row.is_active,
            is_staff: row.is_staff,
            is_superuser: row.is_superuser,
            created_at: parse_timestamp(&row.created_at),
            updated_at: parse_timestamp(&row.updated_at),
        })
    }
}

/// Database row for AuthToken
#[derive(Debug, FromRow)]
pub(crate) struct TokenRow {
    pub key: String,
    pub user_id: String,
    pub created_at: String,
}

impl TryFrom<TokenRow> for AuthToken {
    type Error = StoreError;

    fn try_from(row: TokenRow) -> StoreResult<Self> {
        Ok(AuthToken {
            key: row.key,
            user_id: parse_uuid(&row.user_id)?,
            created_at: parse_timestamp(&row.created_at),
        })
    }
}

/// Database row for Recipe, without its tags
#[derive(Debug, FromRow)]
pub(crate) struct RecipeRow {
    pub id: i64,
    pub user_id: String,
    pub title: String,
    pub time_minutes: i32,
    pub price_cents: i64,
    pub link: String,
    pub description: String,
    pub created_at: String,
    pub updated_at: String,
}

impl RecipeRow {
    pub fn into_recipe(self, tags: Vec<Tag>) -> StoreResult<Recipe> {
        Ok(Recipe {
            id: self.id,
            user_id: parse_uuid(&self.user_id)?,
            title: self.title,
            time_minutes: self.time_minutes,
            price: Price::from_cents(self.price_cents),
            link: self.link,
            description: self.description,
            tags,
            created_at: parse_timestamp(&self.created_at),
            updated_at: parse_timestamp(&self.updated_at),
        })
    }
}

/// Database row for Tag
#[derive(Debug, FromRow)]
pub(crate) struct TagRow {
    pub id: i64,
    pub user_id: String,
    pub name: String,
    pub created_at: String,
}

impl TryFrom<TagRow> for Tag {
    type Error = StoreError;

    fn try_from(row: TagRow) -> StoreResult<Self> {
        Ok(Tag {
            id: row.id,
            user_id: parse_uuid(&row.user_id)?,
            name: row.name,
            created_at: parse_timestamp(&row.created_at),
        })
    }
}

/// A tag joined with the recipe it is attached to
#[derive(Debug, FromRow)]
pub(crate) struct RecipeTagRow {
    pub recipe_id: i64,
    #[sqlx(flatten)]
    pub tag: TagRow,
}
