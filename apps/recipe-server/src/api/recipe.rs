//! Recipe API endpoints.

use std::sync::Arc;

use api_protocol::{requests::RecipeRequest, responses::*};
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

/// Lists the caller's recipes, newest first.
pub async fn list_recipes<S: RecipeStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ServerResult<Json<Vec<RecipeResponse>>> {
    let recipes = state.store.list_recipes(user.id).await?;

    Ok(Json(recipes.iter().map(RecipeResponse::from).collect()))
}

/// Creates a recipe owned by the caller.
pub async fn create_recipe<S: RecipeStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiJson(request): ApiJson<RecipeRequest>,
) -> ServerResult<(StatusCode, Json<RecipeDetailResponse>)> {
    let recipe = recipes::create_recipe(&state.store, user.id, request).await?;

    Ok((StatusCode::CREATED, Json(RecipeDetailResponse::from(&recipe))))
}

/// Gets one of the caller's recipes.
pub async fn get_recipe<S: RecipeStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<i64>,
) -> ServerResult<Json<RecipeDetailResponse>> {
    let recipe = recipes::get_recipe(&state.store, user.id, id).await?;

    Ok(Json(RecipeDetailResponse::from(&recipe)))
}

/// Replaces one of the caller's recipes.
pub async fn replace_recipe<S: RecipeStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<RecipeRequest>,
) -> ServerResult<Json<RecipeDetailResponse>> {
    let recipe = recipes::update_recipe(&state.store, user.id, id, request, false).await?;

    Ok(Json(RecipeDetailResponse::from(&recipe)))
}

/// Partially updates one of the caller's recipes.
pub async fn patch_recipe<S: RecipeStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<RecipeRequest>,
) -> ServerResult<Json<RecipeDetailResponse>> {
    let recipe = recipes::update_recipe(&state.store, user.id, id, request, true).await?;

    Ok(Json(RecipeDetailResponse::from(&recipe)))
}

/// Deletes one of the caller's recipes.
pub async fn delete_recipe<S: RecipeStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<i64>,
) -> ServerResult<StatusCode> {
    recipes::delete_recipe(&state.store, user.id, id).await?;

    Ok(StatusCode::NO_CONTENT)
}
