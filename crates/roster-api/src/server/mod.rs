//! Server setup and initialization
//!
//! Wires storage, the platform client, the bot runtime, and the router.

use std::sync::Arc;

use axum::Router;
use roster_common::{AppConfig, AppError};
use roster_db::{create_pool, PoolConfig};
use roster_service::ServiceContext;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::middleware::apply_middleware;
use crate::oauth::OAuthClient;
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let config = state.config();
    let router = apply_middleware(
        create_router(),
        &config.rate_limit,
        config.app.env.is_production(),
    );
    router.merge(health_routes()).with_state(state)
}

/// Initialize all dependencies and create AppState
///
/// Only storage is fatal. A bot that cannot start leaves the dashboard
/// serving mirrored data.
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    info!(url = %config.database.url, "Opening SQLite database...");
    let pool_config = PoolConfig::new(config.database.url.clone())
        .with_max_connections(config.database.max_connections);
    let pool = create_pool(&pool_config)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("Database ready");

    let platform = roster_bot::platform_client(&config.bot);
    let ctx = Arc::new(ServiceContext::sqlite(pool, platform, &config));
    match ctx.settings().reload().await {
        Ok(count) => info!(count, "Settings loaded"),
        Err(e) => warn!(error = %e, "Failed to load settings, using defaults"),
    }

    let bot = roster_bot::start(Arc::clone(&ctx), &config).await;
    let oauth = OAuthClient::new(config.oauth.clone())
        .map_err(|e| AppError::Config(format!("{e:#}")))?;

    Ok(AppState::new(ctx, oauth, bot, config))
}

/// Serve `app` on `addr` until ctrl-c
pub async fn run_server(app: Router, addr: &str) -> Result<(), AppError> {
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    info!("Server stopped");
    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = config.api.address();
    let state = create_app_state(config).await?;
    run_server(create_app(state), &addr).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
