//! API endpoints.

pub mod recipe;
pub mod tag;
pub mod user;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use recipe_store::RecipeStore;

use crate::middleware::auth_middleware;
use crate::state::AppState;

/// Creates the API router with all endpoints.
///
/// Everything except account creation, token issuance and the health check
/// requires a valid token.
pub fn create_router<S: RecipeStore + 'static>(
    state: Arc<AppState<S>>,
) -> Router<Arc<AppState<S>>> {
    let authenticated = Router::new()
        // Account endpoints
        .route("/user/me/", get(user::get_me).patch(user::update_me))
        // Recipe endpoints
        .route(
            "/recipe/recipes/",
            get(recipe::list_recipes).post(recipe::create_recipe),
        )
        .route(
            "/recipe/recipes/:id/",
            get(recipe::get_recipe)
                .put(recipe::replace_recipe)
                .patch(recipe::patch_recipe)
                .delete(recipe::delete_recipe),
        )
        // Tag endpoints
        .route("/recipe/tags/", get(tag::list_tags))
        .route(
            "/recipe/tags/:id/",
            axum::routing::patch(tag::update_tag).delete(tag::delete_tag),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware::<S>));

    Router::new()
        .route("/user/create/", post(user::create_user))
        .route("/user/token/", post(user::create_token))
        // Health check
        .route("/health", get(health_check))
        .merge(authenticated)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
        Router,
    };
    use entities::User;
    use recipe_store::MemoryRecipeStore;
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::services::accounts;
    use crate::state::SharedState;
    use crate::{create_app, create_state};

    /// Router over an in-memory store, driven one request at a time.
    pub struct TestApp {
        pub router: Router,
        pub state: SharedState<MemoryRecipeStore>,
    }

    impl TestApp {
        pub fn new() -> Self {
            let state = create_state(Config::default(), MemoryRecipeStore::new());
            let router = create_app(state.clone());
            Self { router, state }
        }

        pub fn store(&self) -> &MemoryRecipeStore {
            &self.state.store
        }

        /// Sends a request and returns the status and JSON body (`Null` when
        /// the body is empty).
        pub async fn send(
            &self,
            method: Method,
            uri: &str,
            token: Option<&str>,
            body: Option<Value>,
        ) -> (StatusCode, Value) {
            let mut builder = Request::builder().method(method).uri(uri);
            if let Some(token) = token {
                builder = builder.header(header::AUTHORIZATION, format!("Token {token}"));
            }
            let request = match body {
                Some(body) => builder
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
                None => builder.body(Body::empty()).unwrap(),
            };

            let response = self.router.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let json = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).unwrap_or(Value::Null)
            };
            (status, json)
        }

        /// Registers a user and returns it with a valid token key.
        pub async fn user_with_token(&self, email: &str) -> (User, String) {
            let user = accounts::create_user(self.store(), email, "testpass123", "Test User")
                .await
                .unwrap();
            let token = accounts::issue_token(self.store(), email, "testpass123")
                .await
                .unwrap();
            (user, token.key)
        }
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = TestApp::new();
        let response = app
            .router
            .clone()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
