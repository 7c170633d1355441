//! HTTP request handlers
//!
//! Three routes make up the whole surface: the index page (full state
//! snapshot for a newly loading observer), the SSE subscribe endpoint
//! (opens a stream and drives the connection lifecycle), and the toggle
//! endpoint (mutates the store and broadcasts to everyone else).

use std::convert::Infallible;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
};
use futures::StreamExt;
use rand::Rng;
use serde::Deserialize;
use serde_json::json;
use tokio_stream::wrappers::UnboundedReceiverStream;

use super::state::AppState;
use crate::render;
use crate::sse::{drive_connection, Connection, Event, CONNECTED_FRAME};

/// Synthesize a unique originator id with the given prefix.
///
/// Uniqueness matters: duplicate ids silently replace each other in the
/// hub's registry.
fn generate_originator_id(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let salt: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("{}-{}-{}", prefix, nanos, salt)
}

/// GET / - Render the full current state for a newly loading observer.
///
/// The page gets a fresh originator id baked in; its SSE connection and all
/// of its toggle requests carry that id so the page never receives its own
/// updates back.
pub async fn index_handler(State(state): State<Arc<AppState>>) -> Html<String> {
    let checkboxes = state.store.get_all();
    let checked_count = state.store.checked_count();
    let online_count = state.hub.connection_count();
    let originator_id = generate_originator_id("page");

    Html(render::index_page(
        &checkboxes,
        checked_count,
        online_count,
        &originator_id,
    ))
}

/// Query parameters for the SSE subscribe endpoint
#[derive(Debug, Deserialize)]
pub struct EventsParams {
    /// Originator id of the subscribing page, if it has one
    pub originator: Option<String>,
}

/// GET /events - Open an SSE stream and keep it until disconnect.
///
/// The connection's receiver half becomes the response body; the hub holds
/// the sender half for fan-out, and a spawned lifecycle task sends
/// keepalives and unregisters the id when the body stream is dropped.
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<EventsParams>,
) -> Response {
    let originator_id = params
        .originator
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| generate_originator_id("sse"));

    let (conn, rx) = Connection::channel(originator_id);

    // Prime the stream before registering so the comment is the first
    // thing the client sees.
    let _ = conn.send(CONNECTED_FRAME.to_string());

    state.hub.register(conn.clone());
    tokio::spawn(drive_connection(Arc::clone(&state.hub), conn));

    let body = Body::from_stream(UnboundedReceiverStream::new(rx).map(Ok::<_, Infallible>));

    Response::builder()
        .header(header::CONTENT_TYPE, "text/event-stream")
        .header(header::CACHE_CONTROL, "no-cache")
        .header(header::CONNECTION, "keep-alive")
        .header("X-Accel-Buffering", "no") // Disable proxy buffering
        .body(body)
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

/// POST /toggle/:id - Flip one checkbox and broadcast the new fragment.
///
/// Rejects with 400 before touching anything if the id does not parse or is
/// outside the domain. On success the new fragment goes out to every other
/// connection (the originator is excluded when the `X-Originator-ID` header
/// names it) and comes back to the caller as immediate feedback.
pub async fn toggle_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let Ok(id) = id.parse::<usize>() else {
        return (StatusCode::BAD_REQUEST, "Invalid checkbox ID").into_response();
    };

    let new_state = match state.store.toggle(id) {
        Ok(new_state) => new_state,
        Err(e) => {
            tracing::debug!(id, "toggle rejected: {}", e);
            return (StatusCode::BAD_REQUEST, "Checkbox ID out of range").into_response();
        }
    };

    let fragment = render::checkbox_fragment(id, new_state);
    let name = format!("checkbox-{}-updated", id);

    let originator = headers
        .get("X-Originator-ID")
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty());

    let event = match originator {
        Some(originator) => Event::with_origin(name, fragment.clone(), originator),
        None => Event::new(name, fragment.clone()),
    };
    state.hub.broadcast(event);

    Html(fragment).into_response()
}

/// GET /health - Liveness probe.
pub async fn health_handler() -> impl IntoResponse {
    axum::Json(json!({
        "status": "healthy",
        "service": "hypermedia-sync",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
