//! Axum router and server setup.
//! Used by: main.

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/logs", get(handlers::logs::list).post(handlers::logs::append))
        .route("/logs/:id", get(handlers::logs::show))
        .route("/logs/:id/extra-change", get(handlers::logs::extra_change))
        .route("/metrics", get(handlers::metrics::metrics))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn run(state: AppState, addr: &str) -> std::io::Result<()> {
    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("listening on {}", addr);
    axum::serve(listener, router).await
}
