// This is the entry point of the BananaSteal news relay.
//
// **Architecture Overview:**
// - `core/` = Business logic (platform-agnostic)
// - `infra/` = Implementations of core traits (Discord API, storage)
// - `web/` = HTTP adapter the website talks to
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize services (dependency injection)
// 3. Serve the HTTP API

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with several mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
mod core;
#[path = "infra/infra_layer.rs"]
mod infra;
#[path = "web/web_layer.rs"]
mod web;

mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::core::news::{NewsPublisher, NewsService, NewsStore};
use crate::infra::news::{DiscordNewsClient, InMemoryNewsStore, JsonNewsStore};
use crate::web::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    // Initialize logging so we can see what's happening
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env().context("Invalid configuration")?;

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================

    let store: Box<dyn NewsStore> = match &config.news_file {
        Some(path) => {
            let store = JsonNewsStore::open(path, config.news_capacity)
                .await
                .with_context(|| format!("Failed to open news file {}", path.display()))?;
            tracing::info!("Storing news in {}", store.path().display());
            Box::new(store)
        }
        None => {
            tracing::warn!("NEWS_FILE is empty; news will not survive a restart");
            Box::new(InMemoryNewsStore::new(config.news_capacity))
        }
    };

    let publisher: Option<Box<dyn NewsPublisher>> = match config.credentials.clone() {
        Some(credentials) => {
            tracing::info!(?credentials, "Discord relay configured");
            let client = DiscordNewsClient::new(credentials, &config.discord_api_base)
                .context("Failed to create Discord client")?;
            Some(Box::new(client) as Box<dyn NewsPublisher>)
        }
        None => {
            tracing::warn!(
                "Neither DISCORD_BOT_TOKEN + DISCORD_CHANNEL_ID nor DISCORD_WEBHOOK_URL is set; news endpoints will return 500"
            );
            None
        }
    };

    let news = Arc::new(NewsService::new(store, publisher, config.mention_everyone));
    let app = web::router(AppState { news });

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("🍌 BananaSteal server running on http://localhost:{}", config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
