//! Hypermedia Sync
//!
//! Real-time checkbox synchronization over Server-Sent Events. Every
//! connected page sees every toggle, except the page that caused it: the
//! server broadcasts ready-to-swap HTML fragments and excludes the
//! originating connection from its own updates.
//!
//! # Modules
//!
//! - `store`: fixed-domain checkbox state with atomic toggles
//! - `sse`: events, connections, and the broadcast hub
//! - `render`: HTML fragments and the index page
//! - `api`: Axum router and request handlers
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use hypermedia_sync::{api, sse::Hub, store::CheckboxStore};
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = Arc::new(CheckboxStore::new());
//!     let hub = Arc::new(Hub::new());
//!
//!     let runner = Arc::clone(&hub);
//!     tokio::spawn(async move { runner.run().await });
//!
//!     let state = Arc::new(api::AppState::new(store, hub));
//!     let app = api::create_router(state);
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//! }
//! ```

pub mod api;
pub mod render;
pub mod sse;
pub mod store;

// Re-export commonly used items at crate root
pub use api::{create_router, AppState};
pub use sse::{Connection, Event, Hub};
pub use store::{CheckboxId, CheckboxStore, StoreError};

/// Result type for fallible startup paths
pub type SyncResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
