//! Recipe Server binary.

use std::net::SocketAddr;

use recipe_server::{config::Config, create_app, create_state, init_tracing, services::accounts};
use recipe_store::{MemoryRecipeStore, RecipeStore, SqliteRecipeStore};
use tokio::signal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env if present
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    init_tracing(&config.log_level);

    if config.use_memory_store() {
        tracing::warn!("Using in-memory store; data is lost on shutdown");
        serve(config, MemoryRecipeStore::new()).await
    } else {
        let store = SqliteRecipeStore::connect(&config.database_url).await?;
        tracing::info!(database_url = %config.database_url, "Connected to database");
        serve(config, store).await
    }
}

async fn serve<S: RecipeStore + 'static>(config: Config, store: S) -> anyhow::Result<()> {
    let addr: SocketAddr = config.server_addr().parse()?;

    if let Some((email, password)) = config.superuser_credentials() {
        accounts::ensure_superuser(&store, email, password).await?;
    }
    let app = create_app(create_state(config, store));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, shutting down");
        }
    }
}
