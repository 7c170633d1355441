//! API module for the HTTP and SSE endpoints
//!
//! This module wires the store and the broadcast hub into an Axum router:
//! the index page, the SSE subscribe endpoint, and the toggle endpoint.

pub mod handlers;
pub mod http;
pub mod state;

pub use http::create_router;
pub use state::AppState;
