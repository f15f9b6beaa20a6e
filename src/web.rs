use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::{api, service::TrafficService};

pub fn app(service: Arc<TrafficService>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", api::router(service))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

pub async fn run(port: u16, service: Arc<TrafficService>) -> Result<()> {
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Traffic advisory server running at http://localhost:{}", port);
    axum::serve(listener, app(service))
        .await
        .context("Server terminated unexpectedly")
}
