//! Recipe store trait definitions.

use async_trait::async_trait;
use entities::{AuthToken, NewRecipe, Recipe, Tag, User};
use uuid::Uuid;

use crate::StoreResult;

/// Trait for recipe storage operations.
///
/// Recipe and tag operations take the owning user's id and never touch rows
/// belonging to anyone else: a row owned by another user behaves exactly like
/// a missing row.
#[async_trait]
pub trait RecipeStore: Send + Sync {
    // =========================================================================
    // User operations
    // =========================================================================

    /// Creates a new user. Fails with `AlreadyExists` if the email is taken.
    async fn create_user(&self, user: User) -> StoreResult<User>;

    /// Gets a user by ID.
    async fn get_user(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Gets a user by (normalized) email.
    async fn get_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Updates a user's name, password hash and flags.
    async fn update_user(&self, user: User) -> StoreResult<User>;

    // =========================================================================
    // Token operations
    // =========================================================================

    /// Stores a token. Fails with `AlreadyExists` if the user already has one.
    async fn create_token(&self, token: AuthToken) -> StoreResult<AuthToken>;

    /// Gets a token by key.
    async fn get_token(&self, key: &str) -> StoreResult<Option<AuthToken>>;

    /// Gets the token issued to a user, if any.
    async fn get_token_for_user(&self, user_id: Uuid) -> StoreResult<Option<AuthToken>>;

    // =========================================================================
    // Recipe operations
    // =========================================================================

    /// Creates a recipe and attaches its tags.
    async fn create_recipe(&self, recipe: NewRecipe) -> StoreResult<Recipe>;

    /// Gets a recipe owned by `owner`.
    async fn get_recipe(&self, owner: Uuid, id: i64) -> StoreResult<Option<Recipe>>;

    /// Lists all recipes owned by `owner`, newest (highest id) first.
    async fn list_recipes(&self, owner: Uuid) -> StoreResult<Vec<Recipe>>;

    /// Updates a recipe's fields and replaces its tag set.
    ///
    /// The row is matched on both `id` and `user_id`; ownership itself is
    /// never rewritten.
    async fn update_recipe(&self, recipe: Recipe) -> StoreResult<Recipe>;

    /// Deletes a recipe owned by `owner`.
    async fn delete_recipe(&self, owner: Uuid, id: i64) -> StoreResult<()>;

    // =========================================================================
    // Tag operations
    // =========================================================================

    /// Returns the owner's tag with this name, creating it if absent.
    async fn get_or_create_tag(&self, owner: Uuid, name: &str) -> StoreResult<Tag>;

    /// Gets a tag owned by `owner`.
    async fn get_tag(&self, owner: Uuid, id: i64) -> StoreResult<Option<Tag>>;

    /// Lists all tags owned by `owner`, ordered by descending name.
    async fn list_tags(&self, owner: Uuid) -> StoreResult<Vec<Tag>>;

    /// Renames a tag. Fails with `AlreadyExists` if the owner has another tag
    /// with the new name.
    async fn update_tag(&self, tag: Tag) -> StoreResult<Tag>;

    /// Deletes a tag owned by `owner`, detaching it from every recipe.
    async fn delete_tag(&self, owner: Uuid, id: i64) -> StoreResult<()>;
}
