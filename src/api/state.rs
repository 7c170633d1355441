//! Shared application state

use std::sync::Arc;

use crate::sse::Hub;
use crate::store::CheckboxStore;

/// State shared by every request handler.
pub struct AppState {
    /// The checkbox store
    pub store: Arc<CheckboxStore>,
    /// The broadcast hub for streaming connections
    pub hub: Arc<Hub>,
}

impl AppState {
    /// Create the state for a fresh process: empty hub, all boxes unchecked.
    pub fn new(store: Arc<CheckboxStore>, hub: Arc<Hub>) -> Self {
        Self { store, hub }
    }
}
