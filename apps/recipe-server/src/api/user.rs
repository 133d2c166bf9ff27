//! Account API endpoints.

use std::sync::Arc;

use api_protocol::{requests::*, responses::*};
use axum::{extract::State, http::StatusCode, Extension, Json};
use recipe_store::RecipeStore;

use crate::error::{ServerError, ServerResult};
use crate::extract::ApiJson;
use crate::middleware::AuthenticatedUser;
use crate::services::accounts;
use crate::state::AppState;
use crate::validation::Validator;

/// Registers a new account.
pub async fn create_user<S: RecipeStore>(
    State(state): State<Arc<AppState<S>>>,
    ApiJson(request): ApiJson<CreateUserRequest>,
) -> ServerResult<(StatusCode, Json<UserResponse>)> {
    let request = request.trimmed();
    let mut v = Validator::new();
    v.email("email", &request.email);
    v.password("password", &request.password, state.config.password_min_length);
    v.text("name", &request.name);
    v.finish()?;

    let user =
        accounts::create_user(&state.store, &request.email, &request.password, &request.name)
            .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// Exchanges an email/password pair for the account's token.
pub async fn create_token<S: RecipeStore>(
    State(state): State<Arc<AppState<S>>>,
    ApiJson(request): ApiJson<TokenRequest>,
) -> ServerResult<Json<TokenResponse>> {
    let request = request.trimmed();
    let token = accounts::issue_token(&state.store, &request.email, &request.password).await?;

    Ok(Json(TokenResponse { token: token.key }))
}

/// Gets the calling user's account.
pub async fn get_me<S: RecipeStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ServerResult<Json<UserResponse>> {
    let user = state
        .store
        .get_user(user.id)
        .await?
        .ok_or(ServerError::AuthenticationRequired)?;

    Ok(Json(UserResponse::from(&user)))
}

/// Updates the calling user's name and/or password.
pub async fn update_me<S: RecipeStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiJson(request): ApiJson<UpdateUserRequest>,
) -> ServerResult<Json<UserResponse>> {
    let request = request.trimmed();
    let mut v = Validator::new();
    if let Some(name) = &request.name {
        v.text("name", name);
    }
    if let Some(password) = &request.password {
        v.password("password", password, state.config.password_min_length);
    }
    v.finish()?;

    let current = state
        .store
        .get_user(user.id)
        .await?
        .ok_or(ServerError::AuthenticationRequired)?;

    let user = accounts::update_user(
        &state.store,
        current,
        request.name,
        request.password.as_deref(),
    )
    .await?;

    Ok(Json(UserResponse::from(&user)))
}

#[cfg(test)]
mod tests {
    use axum::http::Method;
    use recipe_store::RecipeStore;
    use serde_json::json;

    use crate::api::test_support::TestApp;

    const CREATE_USER_URL: &str = "/user/create/";
    const TOKEN_URL: &str = "/user/token/";
    const ME_URL: &str = "/user/me/";

    #[tokio::test]
    async fn test_create_user_success() {
        let app = TestApp::new();
        let payload = json!({
            "email": "test@example.com",
            "password": "testpass123",
            "name": "Test Name",
        });

        let (status, body) = app.send(Method::POST, CREATE_USER_URL, None, Some(payload)).await;

        assert_eq!(status, 201);
        assert_eq!(body, json!({"email": "test@example.com", "name": "Test Name"}));
        let user = app
            .store()
            .get_user_by_email("test@example.com")
            .await
            .unwrap()
            .unwrap();
        assert!(auth::verify_password("testpass123", &user.password_hash));
    }

    #[tokio::test]
    async fn test_create_user_trims_email_and_name() {
        let app = TestApp::new();
        let payload = json!({"email": " test@Example.com ", "password": "testpass123", "name": " Test "});

        let (status, body) = app.send(Method::POST, CREATE_USER_URL, None, Some(payload)).await;

        assert_eq!(status, 201);
        assert_eq!(body, json!({"email": "test@example.com", "name": "Test"}));

        let payload = json!({"email": "test@example.com ", "password": "testpass123"});
        let (status, _) = app.send(Method::POST, TOKEN_URL, None, Some(payload)).await;
        assert_eq!(status, 200);
    }

    #[tokio::test]
    async fn test_create_user_email_exists() {
        let app = TestApp::new();
        app.user_with_token("test@example.com").await;

        let payload = json!({"email": "test@example.com", "password": "testpass123", "name": "Test"});
        let (status, body) = app.send(Method::POST, CREATE_USER_URL, None, Some(payload)).await;

        assert_eq!(status, 400);
        assert!(body["error"]["fields"]["email"].is_array());
    }

    #[tokio::test]
    async fn test_create_user_password_too_short() {
        let app = TestApp::new();
        let payload = json!({"email": "test@example.com", "password": "pw", "name": "Test"});

        let (status, body) = app.send(Method::POST, CREATE_USER_URL, None, Some(payload)).await;

        assert_eq!(status, 400);
        assert_eq!(body["error"]["code"], "validation_failed");
        assert!(body["error"]["fields"]["password"].is_array());
        assert!(app
            .store()
            .get_user_by_email("test@example.com")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_create_user_rejects_bad_email_and_blank_name() {
        let app = TestApp::new();
        let payload = json!({"email": "not-an-email", "password": "testpass123", "name": " "});

        let (status, body) = app.send(Method::POST, CREATE_USER_URL, None, Some(payload)).await;

        assert_eq!(status, 400);
        assert!(body["error"]["fields"]["email"].is_array());
        assert!(body["error"]["fields"]["name"].is_array());
    }

    #[tokio::test]
    async fn test_create_token_for_user() {
        let app = TestApp::new();
        let (_, key) = app.user_with_token("test@example.com").await;

        let payload = json!({"email": "test@example.com", "password": "testpass123"});
        let (status, body) = app.send(Method::POST, TOKEN_URL, None, Some(payload)).await;

        assert_eq!(status, 200);
        assert_eq!(body["token"], key);
    }

    #[tokio::test]
    async fn test_create_token_bad_credentials() {
        let app = TestApp::new();
        app.user_with_token("test@example.com").await;

        let payload = json!({"email": "test@example.com", "password": "badpass"});
        let (status, body) = app.send(Method::POST, TOKEN_URL, None, Some(payload)).await;

        assert_eq!(status, 400);
        assert!(body.get("token").is_none());
        assert_eq!(
            body["error"]["fields"]["non_field_errors"][0],
            "Unable to authenticate with provided credentials."
        );
    }

    #[tokio::test]
    async fn test_create_token_blank_password() {
        let app = TestApp::new();
        app.user_with_token("test@example.com").await;

        let payload = json!({"email": "test@example.com", "password": ""});
        let (status, body) = app.send(Method::POST, TOKEN_URL, None, Some(payload)).await;

        assert_eq!(status, 400);
        assert!(body.get("token").is_none());
    }

    #[tokio::test]
    async fn test_retrieve_me_requires_auth() {
        let app = TestApp::new();

        let (status, _) = app.send(Method::GET, ME_URL, None, None).await;
        assert_eq!(status, 401);

        let (status, _) = app.send(Method::GET, ME_URL, Some("bogus"), None).await;
        assert_eq!(status, 401);
    }

    #[tokio::test]
    async fn test_retrieve_and_update_me() {
        let app = TestApp::new();
        let (_, key) = app.user_with_token("test@example.com").await;

        let (status, body) = app.send(Method::GET, ME_URL, Some(&key), None).await;
        assert_eq!(status, 200);
        assert_eq!(body, json!({"email": "test@example.com", "name": "Test User"}));

        let payload = json!({"name": "Updated Name", "password": "newpassword123"});
        let (status, body) = app.send(Method::PATCH, ME_URL, Some(&key), Some(payload)).await;
        assert_eq!(status, 200);
        assert_eq!(body["name"], "Updated Name");

        let payload = json!({"email": "test@example.com", "password": "newpassword123"});
        let (status, _) = app.send(Method::POST, TOKEN_URL, None, Some(payload)).await;
        assert_eq!(status, 200);
    }

    #[tokio::test]
    async fn test_me_rejects_post() {
        let app = TestApp::new();
        let (_, key) = app.user_with_token("test@example.com").await;

        let (status, _) = app.send(Method::POST, ME_URL, Some(&key), Some(json!({}))).await;
        assert_eq!(status, 405);
    }
}
