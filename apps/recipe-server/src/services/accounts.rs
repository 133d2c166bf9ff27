//! Account creation, token issuance and token resolution.

use auth::AuthError;
use entities::{AuthToken, User};
use recipe_store::RecipeStore;

use crate::error::{ServerError, ServerResult};

async fn insert_user<S: RecipeStore>(store: &S, user: User) -> ServerResult<User> {
    store.create_user(user).await.map_err(|e| {
        if e.is_already_exists() {
            ServerError::field("email", "user with this email already exists.")
        } else {
            e.into()
        }
    })
}

/// Creates an account with a hashed password.
///
/// The email's domain part is lowercased before it is stored. Fails with a
/// validation error if the email is empty or already registered.
pub async fn create_user<S: RecipeStore>(
    store: &S,
    email: &str,
    password: &str,
    name: &str,
) -> ServerResult<User> {
    if email.is_empty() {
        return Err(ServerError::field("email", "Users must have an email address."));
    }

    let password_hash = auth::hash_password(password)?;
    let user = User::new(email, password_hash).with_name(name);

    let user = insert_user(store, user).await?;

    tracing::info!(user_id = %user.id, "User created");
    Ok(user)
}

/// Creates an account with staff and superuser flags set.
pub async fn create_superuser<S: RecipeStore>(
    store: &S,
    email: &str,
    password: &str,
) -> ServerResult<User> {
    if email.is_empty() {
        return Err(ServerError::field("email", "Users must have an email address."));
    }

    let password_hash = auth::hash_password(password)?;
    let user = User::new(email, password_hash).into_superuser();

    let user = insert_user(store, user).await?;

    tracing::info!(user_id = %user.id, "Superuser created");
    Ok(user)
}

/// Creates the configured superuser unless an account with that email
/// already exists.
pub async fn ensure_superuser<S: RecipeStore>(
    store: &S,
    email: &str,
    password: &str,
) -> ServerResult<()> {
    let normalized = entities::normalize_email(email);
    if store.get_user_by_email(&normalized).await?.is_some() {
        tracing::debug!("Superuser already exists");
        return Ok(());
    }
    create_superuser(store, email, password).await?;
    Ok(())
}

/// Returns the token for an email/password pair, issuing one on first use.
///
/// Every failure (unknown email, wrong or blank password, inactive account)
/// surfaces as the same [`AuthError::InvalidCredentials`].
pub async fn issue_token<S: RecipeStore>(
    store: &S,
    email: &str,
    password: &str,
) -> ServerResult<AuthToken> {
    if email.is_empty() || password.is_empty() {
        return Err(AuthError::InvalidCredentials.into());
    }

    let email = entities::normalize_email(email);
    let user = match store.get_user_by_email(&email).await? {
        Some(user) if user.is_active && auth::verify_password(password, &user.password_hash) => {
            user
        }
        _ => {
            tracing::warn!("Token request rejected");
            return Err(AuthError::InvalidCredentials.into());
        }
    };

    if let Some(token) = store.get_token_for_user(user.id).await? {
        return Ok(token);
    }

    match store
        .create_token(AuthToken::new(auth::generate_token_key(), user.id))
        .await
    {
        Ok(token) => {
            tracing::info!(user_id = %user.id, "Token issued");
            Ok(token)
        }
        // Another request issued this user's token first.
        Err(e) if e.is_already_exists() => store
            .get_token_for_user(user.id)
            .await?
            .ok_or_else(|| ServerError::Internal("token vanished after conflict".to_string())),
        Err(e) => Err(e.into()),
    }
}

/// Resolves a token key to its active owner.
pub async fn authenticate<S: RecipeStore>(store: &S, key: &str) -> ServerResult<User> {
    let token = store
        .get_token(key)
        .await?
        .ok_or(AuthError::InvalidToken)?;

    let user = store
        .get_user(token.user_id)
        .await?
        .ok_or(AuthError::InvalidToken)?;

    if !user.is_active {
        return Err(AuthError::InactiveUser.into());
    }
    Ok(user)
}

/// Changes an account's display name and/or password.
pub async fn update_user<S: RecipeStore>(
    store: &S,
    mut user: User,
    name: Option<String>,
    password: Option<&str>,
) -> ServerResult<User> {
    if let Some(name) = name {
        user.name = name;
    }
    if let Some(password) = password {
        user.password_hash = auth::hash_password(password)?;
    }

    let user = store.update_user(user).await?;
    tracing::info!(user_id = %user.id, "User updated");
    Ok(user)
}
