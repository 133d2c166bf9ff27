//! Application state.

use std::sync::Arc;

use recipe_store::RecipeStore;

use crate::config::Config;

/// Shared application state.
pub struct AppState<S: RecipeStore> {
    /// Server configuration.
    pub config: Config,
    /// Recipe store.
    pub store: S,
}

impl<S: RecipeStore> AppState<S> {
    /// Creates new application state.
    pub fn new(config: Config, store: S) -> Self {
        Self { config, store }
    }
}

/// Type alias for shared state.
pub type SharedState<S> = Arc<AppState<S>>;

/// Creates shared state from config and store.
pub fn create_shared_state<S: RecipeStore>(config: Config, store: S) -> SharedState<S> {
    Arc::new(AppState::new(config, store))
}
