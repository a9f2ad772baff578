//! sprinkle_api - Money-Sprinkling Backend API
//!
//! One participant sprinkles an amount into a room as randomized chunks;
//! other participants each pick at most one chunk, first come first served,
//! until the pool runs out or the claim window closes.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, Router};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod config;
mod domain;
mod error;
mod service;
mod store;

use config::Config;
use domain::ExpiryPolicy;
use service::SprinkleService;
use store::{RoomDirectory, SprinkleStore};

/// Initialize tracing/logging
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sprinkle_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build the application router
fn build_router(service: Arc<SprinkleService>) -> Router {
    // Sprinkle endpoints require caller identity headers; health does not.
    let sprinkle_routes = api::create_router()
        .layer(middleware::from_fn(api::middleware::identity_middleware))
        .layer(middleware::from_fn(api::middleware::logging_middleware));

    Router::new()
        .route("/health", axum::routing::get(health_check))
        .merge(sprinkle_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    init_tracing();

    // Load configuration
    let config = Config::from_env()?;
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    tracing::info!("Starting sprinkle_api server");

    let service = Arc::new(SprinkleService::new(
        Arc::new(SprinkleStore::new()),
        Arc::new(RoomDirectory::new()),
        ExpiryPolicy::new(chrono::Duration::minutes(config.claim_window_minutes)),
        Duration::from_millis(config.lock_wait_ms),
    ));

    tracing::info!("Listening on http://{}", addr);

    // Build router and start server
    let app = build_router(service);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutting down. Goodbye!");

    Ok(())
}

/// Shutdown signal handler for graceful shutdown
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}
