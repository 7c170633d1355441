//! SSE event type and wire framing
//!
//! The framing here is a protocol surface: connected browsers parse these
//! exact byte sequences, so `to_frame` must not change shape.

/// Keepalive comment written to every connection on a fixed interval.
pub const PING_FRAME: &str = ":ping\n\n";

/// Comment written once when a stream is first established.
pub const CONNECTED_FRAME: &str = ": connected\n\n";

/// One named notification destined for fan-out to all connections except
/// an optional excluded originator. Immutable once enqueued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Event name, used by clients as the `sse-swap` subscription topic.
    pub name: String,
    /// Payload, typically an HTML fragment. May span multiple lines.
    pub data: String,
    /// Connection id of the originator to skip during fan-out, if known.
    pub exclude_id: Option<String>,
}

impl Event {
    /// Create an event with no excluded originator.
    pub fn new(name: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
            exclude_id: None,
        }
    }

    /// Create an event that skips the originating connection during fan-out.
    pub fn with_origin(
        name: impl Into<String>,
        data: impl Into<String>,
        exclude_id: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
            exclude_id: Some(exclude_id.into()),
        }
    }

    /// True if `connection_id` is the excluded originator of this event.
    pub fn excludes(&self, connection_id: &str) -> bool {
        self.exclude_id.as_deref() == Some(connection_id)
    }

    /// Render the complete SSE text block for this event.
    ///
    /// Every physical line of the payload becomes its own `data:` line and
    /// the block is terminated by a blank line, per the SSE format.
    pub fn to_frame(&self) -> String {
        let data = self.data.replace('\n', "\ndata: ");
        format!("event: {}\ndata: {}\n\n", self.name, data)
    }
}
