//! HTTP transport.
//!
//! Builds the axum router exposing the discovery document at `/` and the
//! aggregation endpoint at `/calculate-metrics`.

pub mod error;
pub mod handlers;
pub mod validation;

use crate::config::ServerConfig;
use crate::models::ServiceDescriptor;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared, immutable handler state built once at startup.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub descriptor: ServiceDescriptor,
}

/// Create the API router with all endpoints and middleware.
pub fn create_router(state: AppState, server: &ServerConfig) -> Router {
    let mut router = Router::new()
        .route("/", get(handlers::root))
        .route("/calculate-metrics", post(handlers::calculate_metrics))
        .with_state(Arc::new(state))
        .layer(DefaultBodyLimit::max(server.max_body_bytes));

    if server.cors {
        router = router.layer(CorsLayer::very_permissive());
    }

    router.layer(TraceLayer::new_for_http())
}
