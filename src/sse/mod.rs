//! Server-Sent Events core: events, connections, and the broadcast hub
//!
//! This is the concurrent heart of the service. A single [`Hub`] owns the
//! registry of live connections and the unbounded queue of outbound
//! [`Event`]s; one background task drains the queue and fans each event out
//! to every connection except the one that caused it. Each connection runs
//! its own lifecycle task for keepalives and disconnect cleanup.

pub mod connection;
pub mod event;
pub mod hub;

pub use connection::{drive_connection, Connection, KEEPALIVE_INTERVAL};
pub use event::{Event, CONNECTED_FRAME, PING_FRAME};
pub use hub::Hub;
