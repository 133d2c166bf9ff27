//! Recipe and tag mutations scoped to the calling user.

use api_protocol::requests::{RecipeRequest, TagSpec};
use entities::{NewRecipe, Recipe, Tag};
use recipe_store::RecipeStore;
use uuid::Uuid;

use crate::error::{ServerError, ServerResult};
use crate::validation::{validate_recipe, Validator};

fn recipe_not_found() -> ServerError {
    ServerError::NotFound("No Recipe matches the given query.".to_string())
}

fn tag_not_found() -> ServerError {
    ServerError::NotFound("No Tag matches the given query.".to_string())
}

/// Resolves tag specs to the owner's tags, creating missing ones.
pub async fn resolve_tags<S: RecipeStore>(
    store: &S,
    owner: Uuid,
    specs: &[TagSpec],
) -> ServerResult<Vec<Tag>> {
    let mut tags = Vec::with_capacity(specs.len());
    for spec in specs {
        let tag = store.get_or_create_tag(owner, &spec.name).await?;
        if !tags.iter().any(|t: &Tag| t.id == tag.id) {
            tags.push(tag);
        }
    }
    Ok(tags)
}

/// Creates a recipe owned by `owner`.
pub async fn create_recipe<S: RecipeStore>(
    store: &S,
    owner: Uuid,
    request: RecipeRequest,
) -> ServerResult<Recipe> {
    let request = request.trimmed();
    validate_recipe(&request, false)?;

    let (Some(title), Some(time_minutes), Some(price)) =
        (request.title, request.time_minutes, request.price)
    else {
        return Err(ServerError::Internal("validated recipe missing fields".to_string()));
    };

    let tags = match &request.tags {
        Some(specs) => resolve_tags(store, owner, specs).await?,
        None => Vec::new(),
    };

    let mut recipe = NewRecipe::new(owner, title, time_minutes, price).with_tags(tags);
    if let Some(link) = request.link {
        recipe = recipe.with_link(link);
    }
    if let Some(description) = request.description {
        recipe = recipe.with_description(description);
    }

    let recipe = store.create_recipe(recipe).await?;
    tracing::info!(recipe_id = recipe.id, user_id = %owner, "Recipe created");
    Ok(recipe)
}

/// Fetches one of the owner's recipes. Missing and foreign recipes are
/// reported identically.
pub async fn get_recipe<S: RecipeStore>(store: &S, owner: Uuid, id: i64) -> ServerResult<Recipe> {
    store.get_recipe(owner, id).await?.ok_or_else(recipe_not_found)
}

/// Applies a `PUT` (`partial == false`) or `PATCH` body to one of the
/// owner's recipes. Supplied `tags` replace the current tag set.
pub async fn update_recipe<S: RecipeStore>(
    store: &S,
    owner: Uuid,
    id: i64,
    request: RecipeRequest,
    partial: bool,
) -> ServerResult<Recipe> {
    let mut recipe = get_recipe(store, owner, id).await?;
    let request = request.trimmed();
    validate_recipe(&request, partial)?;

    if let Some(title) = request.title {
        recipe.title = title;
    }
    if let Some(time_minutes) = request.time_minutes {
        recipe.time_minutes = time_minutes;
    }
    if let Some(price) = request.price {
        recipe.price = price;
    }
    if let Some(link) = request.link {
        recipe.link = link;
    }
    if let Some(description) = request.description {
        recipe.description = description;
    }
    if let Some(specs) = &request.tags {
        recipe.tags = resolve_tags(store, owner, specs).await?;
    }

    let recipe = store.update_recipe(recipe).await.map_err(|e| {
        if e.is_not_found() {
            recipe_not_found()
        } else {
            e.into()
        }
    })?;
    tracing::info!(recipe_id = id, user_id = %owner, partial, "Recipe updated");
    Ok(recipe)
}

/// Deletes one of the owner's recipes.
pub async fn delete_recipe<S: RecipeStore>(store: &S, owner: Uuid, id: i64) -> ServerResult<()> {
    store.delete_recipe(owner, id).await.map_err(|e| {
        if e.is_not_found() {
            recipe_not_found()
        } else {
            e.into()
        }
    })?;
    tracing::info!(recipe_id = id, user_id = %owner, "Recipe deleted");
    Ok(())
}

/// Renames one of the owner's tags.
pub async fn rename_tag<S: RecipeStore>(
    store: &S,
    owner: Uuid,
    id: i64,
    name: Option<String>,
) -> ServerResult<Tag> {
    let mut tag = store
        .get_tag(owner, id)
        .await?
        .ok_or_else(tag_not_found)?;

    if let Some(name) = name.map(|name| name.trim().to_string()) {
        let mut v = Validator::new();
        v.text("name", &name);
        v.finish()?;
        tag.name = name;
    }

    let tag = store.update_tag(tag).await.map_err(|e| {
        if e.is_already_exists() {
            ServerError::field("name", "Tag with this name already exists.")
        } else if e.is_not_found() {
            tag_not_found()
        } else {
            e.into()
        }
    })?;
    tracing::info!(tag_id = id, user_id = %owner, "Tag renamed");
    Ok(tag)
}

/// Deletes one of the owner's tags, detaching it from their recipes.
pub async fn delete_tag<S: RecipeStore>(store: &S, owner: Uuid, id: i64) -> ServerResult<()> {
    store.delete_tag(owner, id).await.map_err(|e| {
        if e.is_not_found() {
            tag_not_found()
        } else {
            e.into()
        }
    })?;
    tracing::info!(tag_id = id, user_id = %owner, "Tag deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use entities::{Price, User};
    use recipe_store::MemoryRecipeStore;

    use super::*;

    async fn setup() -> (MemoryRecipeStore, Uuid, Uuid) {
        let store = MemoryRecipeStore::new();
        let owner = store
            .create_user(User::new("owner@example.com", "hash"))
            .await
            .unwrap();
        let other = store
            .create_user(User::new("other@example.com", "hash"))
            .await
            .unwrap();
        (store, owner.id, other.id)
    }

    fn sample_request() -> RecipeRequest {
        RecipeRequest {
            title: Some("Sample recipe".to_string()),
            time_minutes: Some(10),
            price: Some(Price::from_cents(500)),
            ..RecipeRequest::default()
        }
    }

    #[tokio::test]
    async fn test_create_reuses_existing_tag() {
        let (store, owner, _) = setup().await;
        let indian = store.get_or_create_tag(owner, "Indian").await.unwrap();

        let recipe = create_recipe(
            &store,
            owner,
            RecipeRequest {
                tags: Some(vec![TagSpec::new("Indian"), TagSpec::new("Breakfast")]),
                ..sample_request()
            },
        )
        .await
        .unwrap();

        let tags = store.list_tags(owner).await.unwrap();
        assert_eq!(tags.len(), 2);
        assert_eq!(recipe.tags.len(), 2);
        assert_eq!(recipe.tags[0].id, indian.id);
        assert_eq!(recipe.tags[1].name, "Breakfast");
    }

    #[tokio::test]
    async fn test_tags_with_same_name_are_per_owner() {
        let (store, owner, other) = setup().await;
        let foreign = store.get_or_create_tag(other, "Dinner").await.unwrap();

        let recipe = create_recipe(
            &store,
            owner,
            RecipeRequest {
                tags: Some(vec![TagSpec::new("Dinner")]),
                ..sample_request()
            },
        )
        .await
        .unwrap();

        assert_ne!(recipe.tags[0].id, foreign.id);
        assert_eq!(recipe.tags[0].user_id, owner);
    }

    #[tokio::test]
    async fn test_partial_update_keeps_other_fields() {
        let (store, owner, _) = setup().await;
        let recipe = create_recipe(
            &store,
            owner,
            RecipeRequest {
                link: Some("https://example.com/recipe.pdf".to_string()),
                tags: Some(vec![TagSpec::new("Lunch")]),
                ..sample_request()
            },
        )
        .await
        .unwrap();

        let updated = update_recipe(
            &store,
            owner,
            recipe.id,
            RecipeRequest {
                title: Some("New title".to_string()),
                ..RecipeRequest::default()
            },
            true,
        )
        .await
        .unwrap();

        assert_eq!(updated.title, "New title");
        assert_eq!(updated.link, "https://example.com/recipe.pdf");
        assert_eq!(updated.tags, recipe.tags);
    }

    #[tokio::test]
    async fn test_full_update_requires_fields_and_replaces_tags() {
        let (store, owner, _) = setup().await;
        let recipe = create_recipe(
            &store,
            owner,
            RecipeRequest {
                tags: Some(vec![TagSpec::new("Lunch")]),
                ..sample_request()
            },
        )
        .await
        .unwrap();

        let result = update_recipe(&store, owner, recipe.id, RecipeRequest::default(), false).await;
        assert!(matches!(result, Err(ServerError::Validation(_))));

        let updated = update_recipe(
            &store,
            owner,
            recipe.id,
            RecipeRequest {
                tags: Some(vec![]),
                ..sample_request()
            },
            false,
        )
        .await
        .unwrap();
        assert!(updated.tags.is_empty());
    }

    #[tokio::test]
    async fn test_foreign_recipe_is_not_found() {
        let (store, owner, other) = setup().await;
        let recipe = create_recipe(&store, owner, sample_request()).await.unwrap();

        assert!(matches!(
            get_recipe(&store, other, recipe.id).await,
            Err(ServerError::NotFound(_))
        ));
        assert!(matches!(
            update_recipe(&store, other, recipe.id, sample_request(), false).await,
            Err(ServerError::NotFound(_))
        ));
        assert!(matches!(
            delete_recipe(&store, other, recipe.id).await,
            Err(ServerError::NotFound(_))
        ));

        let unchanged = get_recipe(&store, owner, recipe.id).await.unwrap();
        assert_eq!(unchanged, recipe);
    }

    #[tokio::test]
    async fn test_rename_tag_conflict() {
        let (store, owner, other) = setup().await;
        let lunch = store.get_or_create_tag(owner, "Lunch").await.unwrap();
        store.get_or_create_tag(owner, "Dinner").await.unwrap();

        let result = rename_tag(&store, owner, lunch.id, Some("Dinner".to_string())).await;
        assert!(matches!(result, Err(ServerError::Validation(fields)) if fields.contains_key("name")));

        let result = rename_tag(&store, other, lunch.id, Some("Brunch".to_string())).await;
        assert!(matches!(result, Err(ServerError::NotFound(_))));

        let renamed = rename_tag(&store, owner, lunch.id, Some("Brunch".to_string()))
            .await
            .unwrap();
        assert_eq!(renamed.name, "Brunch");
    }

    #[tokio::test]
    async fn test_surrounding_whitespace_is_trimmed() {
        let (store, owner, _) = setup().await;
        let indian = store.get_or_create_tag(owner, "Indian").await.unwrap();

        let recipe = create_recipe(
            &store,
            owner,
            RecipeRequest {
                title: Some(" Pongal ".to_string()),
                tags: Some(vec![TagSpec::new("Indian "), TagSpec::new(" Indian")]),
                ..sample_request()
            },
        )
        .await
        .unwrap();

        assert_eq!(recipe.title, "Pongal");
        assert_eq!(recipe.tags.len(), 1);
        assert_eq!(recipe.tags[0].id, indian.id);
        assert_eq!(store.list_tags(owner).await.unwrap().len(), 1);

        let lunch = store.get_or_create_tag(owner, "Lunch").await.unwrap();
        let result = rename_tag(&store, owner, lunch.id, Some(" Indian ".to_string())).await;
        assert!(matches!(result, Err(ServerError::Validation(fields)) if fields.contains_key("name")));

        let renamed = rename_tag(&store, owner, lunch.id, Some(" Brunch\n".to_string()))
            .await
            .unwrap();
        assert_eq!(renamed.name, "Brunch");
    }
}
