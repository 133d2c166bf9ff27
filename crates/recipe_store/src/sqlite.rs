//! SQLite recipe store implementation.

use std::collections::HashMap;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use entities::{AuthToken, NewRecipe, Recipe, Tag, User};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite, SqliteConnection};
use uuid::Uuid;

use crate::schema::{RecipeRow, RecipeTagRow, TagRow, TokenRow, UserRow, SCHEMA_SQL};
use crate::{RecipeStore, StoreError, StoreResult};

const USER_COLUMNS: &str =
    "id, email, password_hash, name, is_active, is_staff, is_superuser, created_at, updated_at";
const RECIPE_COLUMNS: &str =
    "id, user_id, title, time_minutes, price_cents, link, description, created_at, updated_at";

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}

fn is_in_memory_url(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

/// SQLite-backed recipe store.
#[derive(Debug, Clone)]
pub struct SqliteRecipeStore {
    pool: Pool<Sqlite>,
}

impl SqliteRecipeStore {
    /// Opens (creating if missing) the database at `database_url` and applies
    /// the schema.
    ///
    /// In-memory URLs get a single connection that is never recycled, since
    /// every SQLite in-memory connection is a separate database.
    pub async fn connect(database_url: &str) -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool_options = if is_in_memory_url(database_url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };
        let pool = pool_options.connect_with(options).await?;

        Self::from_pool(pool).await
    }

    /// Wraps an existing pool and applies the schema.
    pub async fn from_pool(pool: Pool<Sqlite>) -> StoreResult<Self> {
        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    async fn run_migrations(&self) -> StoreResult<()> {
        sqlx::raw_sql(SCHEMA_SQL).execute(&self.pool).await?;
        tracing::debug!("Recipe store schema applied");
        Ok(())
    }

    async fn load_recipe_tags(&self, recipe_id: i64) -> StoreResult<Vec<Tag>> {
        let rows: Vec<TagRow> = sqlx::query_as(
            "SELECT t.id, t.user_id, t.name, t.created_at
             FROM tags t
             JOIN recipe_tags rt ON rt.tag_id = t.id
             WHERE rt.recipe_id = ?
             ORDER BY t.id",
        )
        .bind(recipe_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Tag::try_from).collect()
    }
}

/// Links tags to a recipe, accepting only tags owned by `owner`.
async fn attach_tags(
    conn: &mut SqliteConnection,
    owner: Uuid,
    recipe_id: i64,
    tags: &[Tag],
) -> StoreResult<()> {
    let mut seen = Vec::with_capacity(tags.len());
    for tag in tags {
        if seen.contains(&tag.id) {
            continue;
        }
        seen.push(tag.id);

        let result = sqlx::query(
            "INSERT INTO recipe_tags (recipe_id, tag_id)
             SELECT ?, id FROM tags WHERE id = ? AND user_id = ?",
        )
        .bind(recipe_id)
        .bind(tag.id)
        .bind(owner.to_string())
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::ForeignKeyViolation(format!(
                "tag {} is not owned by user {}",
                tag.id, owner
            )));
        }
    }
    Ok(())
}

#[async_trait]
impl RecipeStore for SqliteRecipeStore {
    // =========================================================================
    // User operations
    // =========================================================================

    async fn create_user(&self, user: User) -> StoreResult<User> {
        sqlx::query(
            "INSERT INTO users (id, email, password_hash, name, is_active, is_staff, is_superuser, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(user.id.to_string())
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.name)
        .bind(user.is_active)
        .bind(user.is_staff)
        .bind(user.is_superuser)
        .bind(user.created_at.to_rfc3339())
        .bind(user.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::already_exists("User", &user.email)
            } else {
                StoreError::Database(e)
            }
        })?;

        Ok(user)
    }

    async fn get_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await?;

        row.map(User::try_from).transpose()
    }

    async fn get_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?"))
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;

        row.map(User::try_from).transpose()
    }

    async fn update_user(&self, user: User) -> StoreResult<User> {
        let mut user = user;
        user.updated_at = Utc::now();

        let result = sqlx::query(
            "UPDATE users SET name = ?, password_hash = ?, is_active = ?, is_staff = ?, is_superuser = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(user.is_active)
        .bind(user.is_staff)
        .bind(user.is_superuser)
        .bind(user.updated_at.to_rfc3339())
        .bind(user.id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("User", user.id));
        }
        Ok(user)
    }

    // =========================================================================
    // Token operations
    // =========================================================================

    async fn create_token(&self, token: AuthToken) -> StoreResult<AuthToken> {
        sqlx::query("INSERT INTO auth_tokens (key, user_id, created_at) VALUES (?, ?, ?)")
            .bind(&token.key)
            .bind(token.user_id.to_string())
            .bind(token.created_at.to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    StoreError::already_exists("AuthToken", token.user_id)
                } else if is_foreign_key_violation(&e) {
                    StoreError::ForeignKeyViolation(format!(
                        "user {} does not exist",
                        token.user_id
                    ))
                } else {
                    StoreError::Database(e)
                }
            })?;

        Ok(token)
    }

    async fn get_token(&self, key: &str) -> StoreResult<Option<AuthToken>> {
        let row: Option<TokenRow> =
            sqlx::query_as("SELECT key, user_id, created_at FROM auth_tokens WHERE key = ?")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        row.map(AuthToken::try_from).transpose()
    }

    async fn get_token_for_user(&self, user_id: Uuid) -> StoreResult<Option<AuthToken>> {
        let row: Option<TokenRow> =
            sqlx::query_as("SELECT key, user_id, created_at FROM auth_tokens WHERE user_id = ?")
                .bind(user_id.to_string())
                .fetch_optional(&self.pool)
                .await?;

        row.map(AuthToken::try_from).transpose()
    }

    // =========================================================================
    // Recipe operations
    // =========================================================================

    async fn create_recipe(&self, recipe: NewRecipe) -> StoreResult<Recipe> {
        let owner = recipe.user_id;
        let now = Utc::now().to_rfc3339();
        let mut tx = self.pool.begin().await?;

        let id = sqlx::query(
            "INSERT INTO recipes (user_id, title, time_minutes, price_cents, link, description, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(owner.to_string())
        .bind(&recipe.title)
        .bind(recipe.time_minutes)
        .bind(recipe.price.cents())
        .bind(&recipe.link)
        .bind(&recipe.description)
        .bind(&now)
        .bind(&now)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        attach_tags(&mut tx, owner, id, &recipe.tags).await?;
        tx.commit().await?;

        self.get_recipe(owner, id)
            .await?
            .ok_or_else(|| StoreError::not_found("Recipe", id))
    }

    async fn get_recipe(&self, owner: Uuid, id: i64) -> StoreResult<Option<Recipe>> {
        let row: Option<RecipeRow> = sqlx::query_as(&format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes WHERE id = ? AND user_id = ?"
        ))
        .bind(id)
        .bind(owner.to_string())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let tags = self.load_recipe_tags(row.id).await?;
                row.into_recipe(tags).map(Some)
            }
            None => Ok(None),
        }
    }

    async fn list_recipes(&self, owner: Uuid) -> StoreResult<Vec<Recipe>> {
        let rows: Vec<RecipeRow> = sqlx::query_as(&format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes WHERE user_id = ? ORDER BY id DESC"
        ))
        .bind(owner.to_string())
        .fetch_all(&self.pool)
        .await?;

        let tag_rows: Vec<RecipeTagRow> = sqlx::query_as(
            "SELECT rt.recipe_id, t.id, t.user_id, t.name, t.created_at
             FROM recipe_tags rt
             JOIN tags t ON t.id = rt.tag_id
             JOIN recipes r ON r.id = rt.recipe_id
             WHERE r.user_id = ?
             ORDER BY t.id",
        )
        .bind(owner.to_string())
        .fetch_all(&self.pool)
        .await?;

        let mut tags_by_recipe: HashMap<i64, Vec<Tag>> = HashMap::new();
        for row in tag_rows {
            tags_by_recipe
                .entry(row.recipe_id)
                .or_default()
                .push(Tag::try_from(row.tag)?);
        }

        rows.into_iter()
            .map(|row| {
                let tags = tags_by_recipe.remove(&row.id).unwrap_or_default();
                row.into_recipe(tags)
            })
            .collect()
    }

    async fn update_recipe(&self, recipe: Recipe) -> StoreResult<Recipe> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "UPDATE recipes
             SET title = ?, time_minutes = ?, price_cents = ?, link = ?, description = ?, updated_at = ?
             WHERE id = ? AND user_id = ?",
        )
        .bind(&recipe.title)
        .bind(recipe.time_minutes)
        .bind(recipe.price.cents())
        .bind(&recipe.link)
        .bind(&recipe.description)
        .bind(Utc::now().to_rfc3339())
        .bind(recipe.id)
        .bind(recipe.user_id.to_string())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Recipe", recipe.id));
        }

        sqlx::query("DELETE FROM recipe_tags WHERE recipe_id = ?")
            .bind(recipe.id)
            .execute(&mut *tx)
            .await?;
        attach_tags(&mut tx, recipe.user_id, recipe.id, &recipe.tags).await?;
        tx.commit().await?;

        self.get_recipe(recipe.user_id, recipe.id)
            .await?
            .ok_or_else(|| StoreError::not_found("Recipe", recipe.id))
    }

    async fn delete_recipe(&self, owner: Uuid, id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(owner.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Recipe", id));
        }
        Ok(())
    }

    // =========================================================================
    // Tag operations
    // =========================================================================

    async fn get_or_create_tag(&self, owner: Uuid, name: &str) -> StoreResult<Tag> {
        // The unique (user_id, name) constraint settles concurrent creators;
        // the loser's insert is a no-op and both read back the same row.
        sqlx::query(
            "INSERT INTO tags (user_id, name, created_at) VALUES (?, ?, ?)
             ON CONFLICT (user_id, name) DO NOTHING",
        )
        .bind(owner.to_string())
        .bind(name)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        let row: TagRow = sqlx::query_as(
            "SELECT id, user_id, name, created_at FROM tags WHERE user_id = ? AND name = ?",
        )
        .bind(owner.to_string())
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Tag::try_from(row)
    }

    async fn get_tag(&self, owner: Uuid, id: i64) -> StoreResult<Option<Tag>> {
        let row: Option<TagRow> = sqlx::query_as(
            "SELECT id, user_id, name, created_at FROM tags WHERE id = ? AND user_id = ?",
        )
        .bind(id)
        .bind(owner.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Tag::try_from).transpose()
    }

    async fn list_tags(&self, owner: Uuid) -> StoreResult<Vec<Tag>> {
        let rows: Vec<TagRow> = sqlx::query_as(
            "SELECT id, user_id, name, created_at FROM tags WHERE user_id = ? ORDER BY name DESC",
        )
        .bind(owner.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Tag::try_from).collect()
    }

    async fn update_tag(&self, tag: Tag) -> StoreResult<Tag> {
        let result = sqlx::query("UPDATE tags SET name = ? WHERE id = ? AND user_id = ?")
            .bind(&tag.name)
            .bind(tag.id)
            .bind(tag.user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    StoreError::already_exists("Tag", &tag.name)
                } else {
                    StoreError::Database(e)
                }
            })?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Tag", tag.id));
        }

        self.get_tag(tag.user_id, tag.id)
            .await?
            .ok_or_else(|| StoreError::not_found("Tag", tag.id))
    }

    async fn delete_tag(&self, owner: Uuid, id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM tags WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(owner.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Tag", id));
        }
        Ok(())
    }
}
