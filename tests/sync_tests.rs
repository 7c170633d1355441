//! Integration tests for hypermedia-sync
//!
//! Exercises the store, the broadcast hub, and the HTTP surface together,
//! the way a set of connected pages would.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use futures::StreamExt;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::timeout;
use tower::util::ServiceExt;

use hypermedia_sync::api::{create_router, AppState};
use hypermedia_sync::sse::{Connection, Hub};
use hypermedia_sync::store::CheckboxStore;

fn make_state() -> Arc<AppState> {
    let state = Arc::new(AppState::new(
        Arc::new(CheckboxStore::new()),
        Arc::new(Hub::new()),
    ));
    let runner = Arc::clone(&state.hub);
    tokio::spawn(async move { runner.run().await });
    state
}

/// Wait until a frame containing `needle` arrives on this connection.
async fn recv_matching(rx: &mut UnboundedReceiver<String>, needle: &str) -> String {
    timeout(Duration::from_secs(1), async {
        loop {
            let frame = rx.recv().await.expect("stream ended unexpectedly");
            if frame.contains(needle) {
                return frame;
            }
        }
    })
    .await
    .unwrap_or_else(|_| panic!("no frame containing {:?} arrived", needle))
}

/// Everything currently queued for this connection, without waiting.
fn drain(rx: &mut UnboundedReceiver<String>) -> Vec<String> {
    let mut frames = Vec::new();
    while let Ok(frame) = rx.try_recv() {
        frames.push(frame);
    }
    frames
}

async fn post_toggle(state: &Arc<AppState>, id: &str, originator: Option<&str>) -> u16 {
    let mut builder = Request::builder().method("POST").uri(format!("/toggle/{}", id));
    if let Some(originator) = originator {
        builder = builder.header("X-Originator-ID", originator);
    }
    let response = create_router(Arc::clone(state))
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();
    response.status().as_u16()
}

// Scenario A: three observers, the originator is excluded from its own update.
#[tokio::test]
async fn test_broadcast_excludes_originator() {
    let state = make_state();

    let (a, mut a_rx) = Connection::channel("a");
    let (b, mut b_rx) = Connection::channel("b");
    let (c, mut c_rx) = Connection::channel("c");
    state.hub.register(a);
    state.hub.register(b);
    state.hub.register(c);

    assert_eq!(post_toggle(&state, "42", Some("a")).await, 200);

    let b_frame = recv_matching(&mut b_rx, "event: checkbox-42-updated").await;
    let c_frame = recv_matching(&mut c_rx, "event: checkbox-42-updated").await;
    for frame in [&b_frame, &c_frame] {
        // Toggle from the initial false, so the payload shows checked=true.
        assert!(frame.contains(r#"data: <input type="checkbox" id="cb-42" checked"#));
    }

    // The hub has processed past the checkbox event (b and c saw it), so
    // everything "a" will ever get for it is already queued. Online-count
    // frames are fine; its own checkbox update is not.
    assert!(drain(&mut a_rx)
        .iter()
        .all(|f| !f.contains("checkbox-42-updated")));
}

// Scenario B: repeated toggles alternate state with no exclusion.
#[tokio::test]
async fn test_toggle_alternates_across_broadcasts() {
    let state = make_state();
    let before = state.store.checked_count();

    let (watcher, mut rx) = Connection::channel("watcher");
    state.hub.register(watcher);

    assert_eq!(post_toggle(&state, "1", None).await, 200);
    assert_eq!(post_toggle(&state, "1", None).await, 200);

    let first = recv_matching(&mut rx, "event: checkbox-1-updated").await;
    assert!(first.contains(r#"id="cb-1" checked"#));

    let second = recv_matching(&mut rx, "event: checkbox-1-updated").await;
    assert!(second.contains(r#"id="cb-1"  hx-post"#));

    assert_eq!(state.store.checked_count(), before);
}

// Scenario C: out-of-range toggles are rejected and broadcast nothing.
#[tokio::test]
async fn test_out_of_range_toggle_is_rejected() {
    let state = make_state();

    let (watcher, mut rx) = Connection::channel("watcher");
    state.hub.register(watcher);
    recv_matching(&mut rx, "online-count-updated").await;

    assert_eq!(post_toggle(&state, "0", None).await, 400);
    assert_eq!(post_toggle(&state, "10001", None).await, 400);

    assert_eq!(state.store.checked_count(), 0);

    // Give the hub loop a chance to process anything wrongly enqueued.
    assert_eq!(post_toggle(&state, "1", None).await, 200);
    let frame = recv_matching(&mut rx, "event: checkbox-").await;
    assert!(frame.contains("checkbox-1-updated"));
    assert!(drain(&mut rx).iter().all(|f| !f.contains("checkbox-0") && !f.contains("checkbox-10001")));
}

#[tokio::test]
async fn test_disconnected_observer_receives_nothing_further() {
    let state = make_state();

    let (gone, gone_rx) = Connection::channel("gone");
    let (stays, mut stays_rx) = Connection::channel("stays");
    state.hub.register(gone.clone());
    state.hub.register(stays);

    // Simulate the lifecycle observing disconnect: drop the body stream,
    // then unregister.
    drop(gone_rx);
    state.hub.unregister("gone");

    assert!(state.hub.snapshot().iter().all(|c| c.id() != "gone"));

    assert_eq!(post_toggle(&state, "5", None).await, 200);
    recv_matching(&mut stays_rx, "checkbox-5-updated").await;
    assert_eq!(state.hub.connection_count(), 1);
}

#[tokio::test]
async fn test_unregister_unknown_id_is_noop() {
    let state = make_state();
    state.hub.unregister("never-seen");
    assert_eq!(state.hub.connection_count(), 0);
}

#[tokio::test]
async fn test_events_endpoint_streams_connected_comment() {
    let state = make_state();
    let app = create_router(Arc::clone(&state));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/events?originator=page-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "text/event-stream"
    );

    let mut body = response.into_body().into_data_stream();
    let first = timeout(Duration::from_secs(1), body.next())
        .await
        .expect("first chunk should arrive")
        .expect("stream should be open")
        .unwrap();
    assert_eq!(&first[..], b": connected\n\n");

    // The subscribing page is now a live, registered connection.
    assert_eq!(state.hub.connection_count(), 1);
    assert!(state.hub.snapshot().iter().any(|c| c.id() == "page-1"));
}

#[tokio::test]
async fn test_many_pages_converge_on_the_same_state() {
    let state = make_state();

    let mut receivers = Vec::new();
    for i in 0..5 {
        let (conn, rx) = Connection::channel(format!("page-{}", i));
        state.hub.register(conn);
        receivers.push(rx);
    }

    for id in [10, 20, 30] {
        assert_eq!(post_toggle(&state, &id.to_string(), None).await, 200);
    }

    // Every observer sees every update, in enqueue order.
    for rx in &mut receivers {
        for id in [10, 20, 30] {
            let frame = recv_matching(rx, &format!("checkbox-{}-updated", id)).await;
            assert!(frame.contains("checked"));
        }
    }
    assert_eq!(state.store.checked_count(), 3);
}
