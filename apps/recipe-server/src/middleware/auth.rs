//! Authentication middleware.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use entities::User;
use recipe_store::RecipeStore;
use uuid::Uuid;

use crate::error::ServerError;
use crate::services::accounts;
use crate::state::AppState;

/// Authorization schemes accepted in front of a token key, matched without
/// regard to case.
const TOKEN_SCHEMES: [&str; 2] = ["Token", "Bearer"];

/// Authenticated user information.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// User ID.
    pub id: Uuid,
    /// User email.
    pub email: String,
    /// User display name.
    pub name: String,
}

impl From<&User> for AuthenticatedUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
        }
    }
}

/// Extracts the token key from an `Authorization` header value.
fn parse_authorization(value: &str) -> Option<&str> {
    let (scheme, key) = value.split_once(' ')?;
    if !TOKEN_SCHEMES.iter().any(|s| s.eq_ignore_ascii_case(scheme)) {
        return None;
    }
    Some(key.trim()).filter(|key| !key.is_empty())
}

/// Extracts the token key from the Authorization header.
fn extract_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_authorization)
}

/// Authentication middleware.
///
/// Resolves the request's token to an active user and stores it in the
/// request extensions. Requests without a valid token are rejected with 401.
pub async fn auth_middleware<S: RecipeStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(key) = extract_token(&request).map(str::to_owned) else {
        return ServerError::AuthenticationRequired.into_response();
    };

    let user = match accounts::authenticate(&state.store, &key).await {
        Ok(user) => user,
        Err(e) => {
            tracing::warn!(error = %e, "Rejected request token");
            return e.into_response();
        }
    };

    request.extensions_mut().insert(AuthenticatedUser::from(&user));
    next.run(request).await
}
