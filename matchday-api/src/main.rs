//! # Matchday API Server
//!
//! REST backend for managing a recreational soccer club: player rosters,
//! match scheduling, referee match-day sessions, and club accounting
//! (dues, match fees, payment reconciliation).
//!
//! ## Architecture
//!
//! The server is built with Axum on a PostgreSQL store and provides:
//! - Table-per-resource CRUD endpoints under `/v1`
//! - The match-fee calculator and VOID/restore bookkeeping
//! - Dues renewal and missed-month reporting
//! - A live SSE tail for referee sessions
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgresql://localhost/matchday cargo run -p matchday-api
//! ```

use matchday_api::app::{build_router, AppState};
use matchday_api::config::Config;
use matchday_shared::db::{migrations, pool};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "matchday_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Matchday API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let db = pool::create_pool(pool::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    migrations::run_migrations(&db).await?;

    let bind_address = config.bind_address();
    let state = AppState::new(db, config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown signal received, exiting...");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
    }
}
