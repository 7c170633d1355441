//! Hypermedia Sync - Binary Entry Point
//!
//! Starts the broadcast hub's fan-out loop and the HTTP server.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use hypermedia_sync::api::{create_router, AppState};
use hypermedia_sync::sse::Hub;
use hypermedia_sync::store::CheckboxStore;
use hypermedia_sync::SyncResult;

#[tokio::main]
async fn main() -> SyncResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let store = Arc::new(CheckboxStore::new());
    let hub = Arc::new(Hub::new());

    // The fan-out loop runs for the process lifetime; it is never joined.
    let runner = Arc::clone(&hub);
    tokio::spawn(async move { runner.run().await });

    let state = Arc::new(AppState::new(Arc::clone(&store), hub));
    let app = create_router(state);

    let port: u16 = std::env::var("SYNC_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);
    let addr = format!("0.0.0.0:{}", port);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(
        %addr,
        checkboxes = store.domain_size(),
        "hypermedia-sync listening"
    );
    axum::serve(listener, app).await?;

    Ok(())
}
