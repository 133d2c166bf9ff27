//! In-memory recipe store implementation for testing.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use entities::{AuthToken, NewRecipe, Recipe, Tag, User};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{RecipeStore, StoreError, StoreResult};

/// A recipe row with its tags held by id, as in a join table.
#[derive(Debug, Clone)]
struct StoredRecipe {
    recipe: Recipe,
    tag_ids: Vec<i64>,
}

/// In-memory recipe store for testing purposes.
///
/// Lock order is `recipes` before `tags` wherever both are held.
#[derive(Debug, Clone)]
pub struct MemoryRecipeStore {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
    tokens: Arc<RwLock<HashMap<String, AuthToken>>>,
    recipes: Arc<RwLock<BTreeMap<i64, StoredRecipe>>>,
    tags: Arc<RwLock<BTreeMap<i64, Tag>>>,
    next_recipe_id: Arc<AtomicI64>,
    next_tag_id: Arc<AtomicI64>,
}

impl Default for MemoryRecipeStore {
    fn default() -> Self {
        Self {
            users: Arc::default(),
            tokens: Arc::default(),
            recipes: Arc::default(),
            tags: Arc::default(),
            next_recipe_id: Arc::new(AtomicI64::new(1)),
            next_tag_id: Arc::new(AtomicI64::new(1)),
        }
    }
}

impl MemoryRecipeStore {
    /// Creates a new in-memory recipe store.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Resolves tag ids against the tag table, keeping only the owner's tags.
fn hydrate(stored: &StoredRecipe, tags: &BTreeMap<i64, Tag>) -> Recipe {
    let mut recipe = stored.recipe.clone();
    let owner = recipe.user_id;
    recipe.tags = stored
        .tag_ids
        .iter()
        .filter_map(|id| tags.get(id))
        .filter(|t| t.is_owned_by(owner))
        .cloned()
        .collect();
    recipe
}

/// Checks that every tag exists and belongs to `owner`, returning the ids in
/// ascending order.
fn owned_tag_ids(
    owner: Uuid,
    requested: &[Tag],
    tags: &BTreeMap<i64, Tag>,
) -> StoreResult<Vec<i64>> {
    let mut ids = Vec::with_capacity(requested.len());
    for tag in requested {
        match tags.get(&tag.id) {
            Some(stored) if stored.is_owned_by(owner) => {
                if !ids.contains(&stored.id) {
                    ids.push(stored.id);
                }
            }
            _ => {
                return Err(StoreError::ForeignKeyViolation(format!(
                    "tag {} is not owned by user {}",
                    tag.id, owner
                )))
            }
        }
    }
    ids.sort_unstable();
    Ok(ids)
}

#[async_trait]
impl RecipeStore for MemoryRecipeStore {
    // =========================================================================
    // User operations
    // =========================================================================

    async fn create_user(&self, user: User) -> StoreResult<User> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.id) || users.values().any(|u| u.email == user.email) {
            return Err(StoreError::already_exists("User", &user.email));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn update_user(&self, user: User) -> StoreResult<User> {
        let mut users = self.users.write().await;
        if !users.contains_key(&user.id) {
            return Err(StoreError::not_found("User", user.id));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    // =========================================================================
    // Token operations
    // =========================================================================

    async fn create_token(&self, token: AuthToken) -> StoreResult<AuthToken> {
        let users = self.users.read().await;
        if !users.contains_key(&token.user_id) {
            return Err(StoreError::ForeignKeyViolation(format!(
                "user {} does not exist",
                token.user_id
            )));
        }
        let mut tokens = self.tokens.write().await;
        if tokens.contains_key(&token.key) || tokens.values().any(|t| t.user_id == token.user_id) {
            return Err(StoreError::already_exists("AuthToken", token.user_id));
        }
        tokens.insert(token.key.clone(), token.clone());
        Ok(token)
    }

    async fn get_token(&self, key: &str) -> StoreResult<Option<AuthToken>> {
        let tokens = self.tokens.read().await;
        Ok(tokens.get(key).cloned())
    }

    async fn get_token_for_user(&self, user_id: Uuid) -> StoreResult<Option<AuthToken>> {
        let tokens = self.tokens.read().await;
        Ok(tokens.values().find(|t| t.user_id == user_id).cloned())
    }

    // =========================================================================
    // Recipe operations
    // =========================================================================

    async fn create_recipe(&self, recipe: NewRecipe) -> StoreResult<Recipe> {
        let mut recipes = self.recipes.write().await;
        let tags = self.tags.read().await;
        let tag_ids = owned_tag_ids(recipe.user_id, &recipe.tags, &tags)?;

        let id = self.next_recipe_id.fetch_add(1, Ordering::SeqCst);
        let stored = StoredRecipe {
            recipe: recipe.into_recipe(id),
            tag_ids,
        };
        let created = hydrate(&stored, &tags);
        recipes.insert(id, stored);
        Ok(created)
    }

    async fn get_recipe(&self, owner: Uuid, id: i64) -> StoreResult<Option<Recipe>> {
        let recipes = self.recipes.read().await;
        let tags = self.tags.read().await;
        Ok(recipes
            .get(&id)
            .filter(|r| r.recipe.is_owned_by(owner))
            .map(|r| hydrate(r, &tags)))
    }

    async fn list_recipes(&self, owner: Uuid) -> StoreResult<Vec<Recipe>> {
        let recipes = self.recipes.read().await;
        let tags = self.tags.read().await;
        Ok(recipes
            .values()
            .rev()
            .filter(|r| r.recipe.is_owned_by(owner))
            .map(|r| hydrate(r, &tags))
            .collect())
    }

    async fn update_recipe(&self, recipe: Recipe) -> StoreResult<Recipe> {
        let mut recipes = self.recipes.write().await;
        let tags = self.tags.read().await;

        let stored = recipes
            .get_mut(&recipe.id)
            .filter(|r| r.recipe.is_owned_by(recipe.user_id))
            .ok_or_else(|| StoreError::not_found("Recipe", recipe.id))?;
        let tag_ids = owned_tag_ids(stored.recipe.user_id, &recipe.tags, &tags)?;

        let current = &mut stored.recipe;
        current.title = recipe.title;
        current.time_minutes = recipe.time_minutes;
        current.price = recipe.price;
        current.link = recipe.link;
        current.description = recipe.description;
        current.updated_at = Utc::now();
        stored.tag_ids = tag_ids;

        Ok(hydrate(stored, &tags))
    }

    async fn delete_recipe(&self, owner: Uuid, id: i64) -> StoreResult<()> {
        let mut recipes = self.recipes.write().await;
        match recipes.get(&id) {
            Some(r) if r.recipe.is_owned_by(owner) => {
                recipes.remove(&id);
                Ok(())
            }
            _ => Err(StoreError::not_found("Recipe", id)),
        }
    }

    // =========================================================================
    // Tag operations
    // =========================================================================

    async fn get_or_create_tag(&self, owner: Uuid, name: &str) -> StoreResult<Tag> {
        let mut tags = self.tags.write().await;
        if let Some(existing) = tags
            .values()
            .find(|t| t.is_owned_by(owner) && t.name == name)
        {
            return Ok(existing.clone());
        }

        let tag = Tag {
            id: self.next_tag_id.fetch_add(1, Ordering::SeqCst),
            user_id: owner,
            name: name.to_string(),
            created_at: Utc::now(),
        };
        tags.insert(tag.id, tag.clone());
        Ok(tag)
    }

    async fn get_tag(&self, owner: Uuid, id: i64) -> StoreResult<Option<Tag>> {
        let tags = self.tags.read().await;
        Ok(tags.get(&id).filter(|t| t.is_owned_by(owner)).cloned())
    }

    async fn list_tags(&self, owner: Uuid) -> StoreResult<Vec<Tag>> {
        let tags = self.tags.read().await;
        let mut result: Vec<Tag> = tags
            .values()
            .filter(|t| t.is_owned_by(owner))
            .cloned()
            .collect();
        result.sort_by(|a, b| b.name.cmp(&a.name));
        Ok(result)
    }

    async fn update_tag(&self, tag: Tag) -> StoreResult<Tag> {
        let mut tags = self.tags.write().await;
        if tags
            .values()
            .any(|t| t.is_owned_by(tag.user_id) && t.name == tag.name && t.id != tag.id)
        {
            return Err(StoreError::already_exists("Tag", &tag.name));
        }

        let stored = tags
            .get_mut(&tag.id)
            .filter(|t| t.is_owned_by(tag.user_id))
            .ok_or_else(|| StoreError::not_found("Tag", tag.id))?;
        stored.name = tag.name;
        Ok(stored.clone())
    }

    async fn delete_tag(&self, owner: Uuid, id: i64) -> StoreResult<()> {
        let mut recipes = self.recipes.write().await;
        let mut tags = self.tags.write().await;
        match tags.get(&id) {
            Some(t) if t.is_owned_by(owner) => {
                tags.remove(&id);
            }
            _ => return Err(StoreError::not_found("Tag", id)),
        }
        for stored in recipes.values_mut() {
            stored.tag_ids.retain(|tag_id| *tag_id != id);
        }
        Ok(())
    }
}
