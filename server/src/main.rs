//! Botgame Server - HTTP backend for the game's user registry.
//!
//! Exposes the user records, the points ranking, and the friend-list join
//! over HTTP, with the registry core from botgame-engine doing the actual
//! work against a PostgreSQL record store.

mod config;
mod db;
mod error;
mod handlers;
mod routes;

use crate::config::Config;
use crate::db::PgStore;
use axum::Router;
use botgame_engine::{FriendGraphView, IdentityAllocator, ScoreLedger};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Application state shared across handlers.
///
/// The store is built once at startup and injected into each registry
/// component; nothing here is ambient or global.
#[derive(Clone)]
pub struct AppState {
    pub allocator: IdentityAllocator<PgStore>,
    pub ledger: ScoreLedger<PgStore>,
    pub friends: FriendGraphView<PgStore>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "botgame_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    tracing::info!("Starting Botgame Server on {}:{}", config.host, config.port);

    // Create database pool
    let pool = db::create_pool(&config.database_url).await?;

    // Run migrations
    tracing::info!("Running database migrations...");
    db::run_migrations(&pool).await?;

    // Build application state around one shared store
    let store = Arc::new(PgStore::new(pool));
    let state = AppState {
        allocator: IdentityAllocator::new(Arc::clone(&store)),
        ledger: ScoreLedger::new(Arc::clone(&store)),
        friends: FriendGraphView::new(store),
    };

    // Build router
    let app = Router::new()
        .merge(routes::create_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
