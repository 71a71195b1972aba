//! WebSocket-backed [`MessagePusher`] implementation.
//!
//! Holds the `UnboundedSender` for every live connection. The UI layer
//! creates the channel when a socket upgrades and registers it here; the
//! usecase layer fans events out through this map without ever touching the
//! sockets themselves.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, MessagePusher, PusherChannel};

/// WebSocket [`MessagePusher`] implementation.
pub struct WebSocketMessagePusher {
    /// Outbound channel per connected client
    connections: Mutex<HashMap<ConnectionId, PusherChannel>>,
}

impl WebSocketMessagePusher {
    /// Create a pusher with no registered connections.
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for WebSocketMessagePusher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_connection(&self, connection_id: ConnectionId, sender: PusherChannel) {
        let mut connections = self.connections.lock().await;
        connections.insert(connection_id, sender);
        tracing::debug!("Connection '{}' registered with pusher", connection_id);
    }

    async fn unregister_connection(&self, connection_id: &ConnectionId) {
        let mut connections = self.connections.lock().await;
        connections.remove(connection_id);
        tracing::debug!("Connection '{}' unregistered from pusher", connection_id);
    }

    async fn push_to(&self, connection_id: &ConnectionId, content: &str) {
        let connections = self.connections.lock().await;
        match connections.get(connection_id) {
            Some(sender) => {
                if let Err(e) = sender.send(content.to_string()) {
                    tracing::warn!("Failed to push to connection '{}': {}", connection_id, e);
                }
            }
            None => {
                tracing::warn!("Connection '{}' not found, push dropped", connection_id);
            }
        }
    }

    async fn broadcast(&self, targets: Vec<ConnectionId>, content: &str) {
        let connections = self.connections.lock().await;
        for target in targets {
            match connections.get(&target) {
                Some(sender) => {
                    // Per-target failures are tolerated in a broadcast.
                    if let Err(e) = sender.send(content.to_string()) {
                        tracing::warn!("Failed to push to connection '{}': {}", target, e);
                    }
                }
                None => {
                    tracing::warn!("Connection '{}' not found during broadcast, skipping", target);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_push_to_delivers_to_registered_connection() {
        // given:
        let pusher = WebSocketMessagePusher::new();
        let conn = ConnectionId::generate();
        let (tx, mut rx) = mpsc::unbounded_channel();
        pusher.register_connection(conn, tx).await;

        // when:
        pusher.push_to(&conn, "hello").await;

        // then:
        assert_eq!(rx.recv().await, Some("hello".to_string()));
    }

    #[tokio::test]
    async fn test_push_to_unknown_connection_is_dropped() {
        // given:
        let pusher = WebSocketMessagePusher::new();
        let conn = ConnectionId::generate();

        // when: no panic, no side effect
        pusher.push_to(&conn, "hello").await;
    }

    #[tokio::test]
    async fn test_broadcast_reaches_all_targets() {
        // given:
        let pusher = WebSocketMessagePusher::new();
        let a = ConnectionId::generate();
        let b = ConnectionId::generate();
        let (tx_a, mut rx_a) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();
        pusher.register_connection(a, tx_a).await;
        pusher.register_connection(b, tx_b).await;

        // when:
        pusher.broadcast(vec![a, b], "state update").await;

        // then:
        assert_eq!(rx_a.recv().await, Some("state update".to_string()));
        assert_eq!(rx_b.recv().await, Some("state update".to_string()));
    }

    #[tokio::test]
    async fn test_broadcast_tolerates_missing_targets() {
        // given:
        let pusher = WebSocketMessagePusher::new();
        let a = ConnectionId::generate();
        let gone = ConnectionId::generate();
        let (tx_a, mut rx_a) = mpsc::unbounded_channel();
        pusher.register_connection(a, tx_a).await;

        // when:
        pusher.broadcast(vec![a, gone], "still delivered").await;

        // then:
        assert_eq!(rx_a.recv().await, Some("still delivered".to_string()));
    }

    #[tokio::test]
    async fn test_unregister_stops_delivery() {
        // given:
        let pusher = WebSocketMessagePusher::new();
        let conn = ConnectionId::generate();
        let (tx, mut rx) = mpsc::unbounded_channel();
        pusher.register_connection(conn, tx).await;
        pusher.unregister_connection(&conn).await;

        // when:
        pusher.push_to(&conn, "too late").await;

        // then: sender side was dropped, nothing arrives
        assert!(rx.try_recv().is_err());
    }
}
