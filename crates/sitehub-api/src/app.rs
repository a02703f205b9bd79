//! Application builder: wires router, middleware, and state into an Axum app.

use axum::Router;
use axum::middleware as axum_middleware;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use sitehub_core::config::AppConfig;
use sitehub_core::{AppError, AppResult};
use sitehub_database::Stores;

use crate::middleware::cors::build_cors_layer;
use crate::middleware::logging::request_logging;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.server.cors);
    build_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum_middleware::from_fn(request_logging))
}

/// Serve the API over `stores` until Ctrl-C.
pub async fn run_server(config: AppConfig, stores: Stores) -> AppResult<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(config, stores);
    let app = build_app(state);

    let listener = TcpListener::bind(&addr).await.map_err(|e| {
        AppError::with_source(
            sitehub_core::ErrorKind::Configuration,
            format!("Failed to bind {addr}"),
            e,
        )
    })?;
    info!(addr = %addr, "SiteHub API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("SiteHub API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
