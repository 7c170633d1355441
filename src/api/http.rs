//! HTTP server setup with Axum

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use super::handlers::{events_handler, health_handler, index_handler, toggle_handler};
use super::state::AppState;

/// Create the Axum router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS configuration - allow all origins for development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Index page with the full state snapshot
        .route("/", get(index_handler))
        // SSE subscribe endpoint
        .route("/events", get(events_handler))
        // Toggle a single checkbox
        .route("/toggle/:id", post(toggle_handler))
        // Health check
        .route("/health", get(health_handler))
        .layer(cors)
        .with_state(state)
}
