//! Broadcast hub
//!
//! The hub composes the connection registry with the outbound event queue.
//! Producers call [`Hub::broadcast`], which enqueues and returns
//! immediately; one long-running task ([`Hub::run`]) drains the queue in
//! order and fans each event out to every registered connection except the
//! event's originator.

use std::collections::HashMap;

use parking_lot::{Mutex, RwLock};
use tokio::sync::mpsc;

use super::connection::Connection;
use super::event::Event;
use crate::render;

/// Central registry and fan-out loop for all streaming connections.
pub struct Hub {
    /// Live connections keyed by originator id. Registering a second
    /// connection under an id already in use replaces the old entry without
    /// closing its sink (last write wins); the replaced connection's own
    /// lifecycle still cleans its stream up on disconnect.
    connections: RwLock<HashMap<String, Connection>>,
    /// Producer side of the event queue. Enqueueing never blocks.
    event_tx: mpsc::UnboundedSender<Event>,
    /// Consumer side, taken exactly once by `run`.
    event_rx: Mutex<Option<mpsc::UnboundedReceiver<Event>>>,
}

impl Hub {
    /// Create a hub with an empty registry and an empty queue.
    pub fn new() -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        Self {
            connections: RwLock::new(HashMap::new()),
            event_tx,
            event_rx: Mutex::new(Some(event_rx)),
        }
    }

    /// Add a connection to the registry and announce the new online count.
    pub fn register(&self, conn: Connection) {
        let online = {
            let mut connections = self.connections.write();
            connections.insert(conn.id().to_string(), conn);
            connections.len()
        };
        tracing::debug!(online, "connection registered");
        self.announce_online(online);
    }

    /// Broadcast the current online count to everyone.
    fn announce_online(&self, online: usize) {
        self.broadcast(Event::new(
            "online-count-updated",
            render::online_counter(online),
        ));
    }

    /// Remove a connection by id. A no-op for unknown ids.
    pub fn unregister(&self, id: &str) {
        let online = {
            let mut connections = self.connections.write();
            match connections.remove(id) {
                Some(_) => connections.len(),
                None => return,
            }
        };
        tracing::debug!(online, "connection unregistered");
        self.announce_online(online);
    }

    /// Remove a connection only if the registry still holds this exact
    /// stream. Lifecycle cleanup uses this instead of [`Hub::unregister`]
    /// so a connection that was already replaced under the same id cannot
    /// evict its live replacement when its own stale stream finally drops.
    pub fn unregister_connection(&self, conn: &Connection) {
        let online = {
            let mut connections = self.connections.write();
            match connections.get(conn.id()) {
                Some(current) if current.same_channel(conn) => {
                    connections.remove(conn.id());
                    connections.len()
                }
                _ => return,
            }
        };
        tracing::debug!(online, "connection unregistered");
        self.announce_online(online);
    }

    /// Number of currently registered connections.
    pub fn connection_count(&self) -> usize {
        self.connections.read().len()
    }

    /// Point-in-time view of the registry, used for one fan-out pass.
    /// Registrations racing with the snapshot may or may not be included.
    pub fn snapshot(&self) -> Vec<Connection> {
        self.connections.read().values().cloned().collect()
    }

    /// Enqueue an event for broadcast. Never blocks the caller; delivery is
    /// fire-and-forget relative to whatever request triggered it.
    pub fn broadcast(&self, event: Event) {
        // Fails only if the run loop's receiver is gone, i.e. the process
        // is tearing down; events are volatile so nothing is lost that
        // anyone was promised.
        if self.event_tx.send(event).is_err() {
            tracing::warn!("broadcast queue closed, dropping event");
        }
    }

    /// Drain the queue for the process lifetime, fanning each event out to
    /// every non-excluded connection. Started once from startup; ends only
    /// when every producer handle is gone.
    pub async fn run(&self) {
        let rx = self.event_rx.lock().take();
        let Some(mut rx) = rx else {
            tracing::error!("hub run loop started twice, ignoring second call");
            return;
        };

        while let Some(event) = rx.recv().await {
            self.fan_out(&event);
        }
        tracing::info!("broadcast queue closed, hub loop exiting");
    }

    /// Deliver one event to every registered connection except the
    /// originator. Each send is independent: a closed sink is skipped and
    /// logged, never retried, and never aborts delivery to the others.
    fn fan_out(&self, event: &Event) {
        let frame = event.to_frame();
        for conn in self.snapshot() {
            if event.excludes(conn.id()) {
                continue;
            }
            if conn.send(frame.clone()).is_err() {
                // A dead sink is cleaned up by that connection's own
                // lifecycle, not here.
                tracing::debug!(id = %conn.id(), event = %event.name, "skipping closed connection");
            }
        }
    }
}

impl Default for Hub {
    fn default() -> Self {
        Self::new()
    }
}
