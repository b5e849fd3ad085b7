//! HTTP API
//!
//! JSON endpoints over the conversion engine and calculator modes.

pub mod commands;
pub mod error;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::config::ServerConfig;
use crate::shared::error::AppResult;
use commands::{calculator, catalog, converter, graphing, programmer};

pub fn router(config: Arc<ServerConfig>) -> Router {
    Router::new()
        .route("/api/convert", post(converter::convert))
        .route("/api/convert-all", post(converter::convert_all))
        .route("/api/convert-misc", post(converter::convert_misc))
        .route("/api/calculate", post(calculator::calculate))
        .route("/api/graph-sample", post(graphing::graph_sample))
        .route("/api/programmer", post(programmer::programmer))
        .route("/api/categories", get(catalog::categories))
        .with_state(config)
}

/// Bind and serve until Ctrl-C
pub async fn serve(config: ServerConfig) -> AppResult<()> {
    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!(address = %listener.local_addr()?, "server listening");

    axum::serve(listener, router(Arc::new(config)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
