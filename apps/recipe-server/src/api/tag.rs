//! Tag API endpoints.

use std::sync::Arc;

use api_protocol::{requests::UpdateTagRequest, responses::TagResponse};
use axum::{
    extract::State,
    http::StatusCode,
    Extension, Json,
};
use recipe_store::RecipeStore;

use crate::error::ServerResult;
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::AuthenticatedUser;
use crate::services::recipes;
use crate::state::AppState;

/// Lists the caller's tags by descending name.
pub async fn list_tags<S: RecipeStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ServerResult<Json<Vec<TagResponse>>> {
    let tags = state.store.list_tags(user.id).await?;

    Ok(Json(tags.iter().map(TagResponse::from).collect()))
}

/// Renames one of the caller's tags.
pub async fn update_tag<S: RecipeStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<UpdateTagRequest>,
) -> ServerResult<Json<TagResponse>> {
    let tag = recipes::rename_tag(&state.store, user.id, id, request.name).await?;

    Ok(Json(TagResponse::from(&tag)))
}

/// Deletes one of the caller's tags.
pub async fn delete_tag<S: RecipeStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<i64>,
) -> ServerResult<StatusCode> {
    recipes::delete_tag(&state.store, user.id, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::http::Method;
    use entities::{NewRecipe, Price};
    use recipe_store::RecipeStore;
    use serde_json::json;

    use crate::api::test_support::TestApp;

    const TAGS_URL: &str = "/recipe/tags/";

    fn detail_url(id: i64) -> String {
        format!("/recipe/tags/{id}/")
    }

    #[tokio::test]
    async fn test_auth_required() {
        let app = TestApp::new();

        let (status, _) = app.send(Method::GET, TAGS_URL, None, None).await;
        assert_eq!(status, 401);
    }

    #[tokio::test]
    async fn test_list_tags_limited_to_user() {
        let app = TestApp::new();
        let (user, key) = app.user_with_token("user@example.com").await;
        let (other, _) = app.user_with_token("other@example.com").await;
        app.store().get_or_create_tag(other.id, "Fruity").await.unwrap();
        app.store().get_or_create_tag(user.id, "Comfort Food").await.unwrap();
        app.store().get_or_create_tag(user.id, "Vegan").await.unwrap();

        let (status, body) = app.send(Method::GET, TAGS_URL, Some(&key), None).await;

        assert_eq!(status, 200);
        let names: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|t| t["name"].as_str())
            .collect();
        assert_eq!(names, vec!["Vegan", "Comfort Food"]);
    }

    #[tokio::test]
    async fn test_update_tag() {
        let app = TestApp::new();
        let (user, key) = app.user_with_token("user@example.com").await;
        let tag = app.store().get_or_create_tag(user.id, "After Dinner").await.unwrap();

        let (status, body) = app
            .send(Method::PATCH, &detail_url(tag.id), Some(&key), Some(json!({"name": "Dessert"})))
            .await;

        assert_eq!(status, 200);
        assert_eq!(body, json!({"id": tag.id, "name": "Dessert"}));
    }

    #[tokio::test]
    async fn test_delete_tag_detaches_from_recipes() {
        let app = TestApp::new();
        let (user, key) = app.user_with_token("user@example.com").await;
        let tag = app.store().get_or_create_tag(user.id, "Breakfast").await.unwrap();
        let recipe = app
            .store()
            .create_recipe(
                NewRecipe::new(user.id, "Eggs", 5, Price::from_cents(100)).with_tags(vec![tag.clone()]),
            )
            .await
            .unwrap();

        let (status, _) = app.send(Method::DELETE, &detail_url(tag.id), Some(&key), None).await;

        assert_eq!(status, 204);
        assert!(app.store().list_tags(user.id).await.unwrap().is_empty());
        let stored = app.store().get_recipe(user.id, recipe.id).await.unwrap().unwrap();
        assert!(stored.tags.is_empty());
    }

    #[tokio::test]
    async fn test_other_users_tag_is_not_found() {
        let app = TestApp::new();
        let (_, key) = app.user_with_token("user@example.com").await;
        let (other, _) = app.user_with_token("other@example.com").await;
        let tag = app.store().get_or_create_tag(other.id, "Private").await.unwrap();

        let (status, _) = app
            .send(Method::PATCH, &detail_url(tag.id), Some(&key), Some(json!({"name": "Mine"})))
            .await;
        assert_eq!(status, 404);

        let (status, _) = app.send(Method::DELETE, &detail_url(tag.id), Some(&key), None).await;
        assert_eq!(status, 404);

        let stored = app.store().get_tag(other.id, tag.id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Private");
    }

    #[tokio::test]
    async fn test_unparsable_tag_id_is_not_found() {
        let app = TestApp::new();
        let (_, key) = app.user_with_token("user@example.com").await;

        let (status, body) = app.send(Method::DELETE, "/recipe/tags/abc/", Some(&key), None).await;

        assert_eq!(status, 404);
        assert_eq!(body["error"]["code"], "not_found");
    }
}
