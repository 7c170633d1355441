//! Per-connection state and lifecycle
//!
//! Each streaming client is represented by a [`Connection`]: an id plus the
//! sending half of an unbounded channel whose receiving half is the HTTP
//! response body. A background task per connection sends keepalives and
//! tears the registration down when the client goes away.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use super::event::PING_FRAME;
use super::hub::Hub;

/// Interval between keepalive comments on an idle stream.
pub const KEEPALIVE_INTERVAL: Duration = Duration::from_secs(30);

/// Error returned when a frame cannot be delivered because the client's
/// stream is gone.
#[derive(Debug)]
pub struct SinkClosed;

impl std::fmt::Display for SinkClosed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Connection sink closed")
    }
}

impl std::error::Error for SinkClosed {}

/// A live streaming connection registered with the hub.
///
/// Cloning a `Connection` clones the sender half only; all clones feed the
/// same client stream. The stream ends when every sender clone is dropped,
/// which happens when the lifecycle task exits and the hub unregisters it.
#[derive(Debug, Clone)]
pub struct Connection {
    id: String,
    sink: mpsc::UnboundedSender<String>,
}

impl Connection {
    /// Build a connection and the receiver that becomes its response body.
    pub fn channel(id: impl Into<String>) -> (Self, mpsc::UnboundedReceiver<String>) {
        let (sink, rx) = mpsc::unbounded_channel();
        (
            Self {
                id: id.into(),
                sink,
            },
            rx,
        )
    }

    /// The caller-supplied (or synthesized) originator id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Queue one pre-framed SSE block for this client.
    ///
    /// Never blocks; fails only when the client has disconnected and the
    /// body stream was dropped.
    pub fn send(&self, frame: String) -> Result<(), SinkClosed> {
        self.sink.send(frame).map_err(|_| SinkClosed)
    }

    /// Resolves once the client's stream is gone (the receiver half was
    /// dropped). An interruptible wait, no polling involved.
    pub async fn closed(&self) {
        self.sink.closed().await;
    }

    /// True if `other` feeds the same client stream as this connection.
    ///
    /// Distinguishes a connection from a later one registered under the
    /// same originator id (an SSE auto-reconnect reuses the page's id).
    pub fn same_channel(&self, other: &Connection) -> bool {
        self.sink.same_channel(&other.sink)
    }
}

/// Drive one connection from active registration to cleanup.
///
/// The task stays suspended on one of two things: the keepalive tick (write
/// `:ping`, failure swallowed) or the disconnect signal. On disconnect it
/// exits the loop, which cancels the timer, then unregisters the id and
/// drops its sender. Cleanup runs exactly once per connection; the
/// connection is never re-entered afterwards.
pub async fn drive_connection(hub: Arc<Hub>, conn: Connection) {
    let mut keepalive = tokio::time::interval(KEEPALIVE_INTERVAL);
    // interval fires immediately; the handler already primed the stream.
    keepalive.tick().await;

    loop {
        tokio::select! {
            _ = keepalive.tick() => {
                if conn.send(PING_FRAME.to_string()).is_err() {
                    tracing::debug!(id = %conn.id(), "keepalive write failed, sink closed");
                }
            }
            _ = conn.closed() => break,
        }
    }

    // Remove this exact connection only: if the id was re-registered by a
    // reconnect in the meantime, the replacement must stay.
    hub.unregister_connection(&conn);
    tracing::debug!(id = %conn.id(), "connection closed and unregistered");
}
