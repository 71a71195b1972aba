//! UseCase: connection teardown.
//!
//! Disconnecting is the only cancellation signal in the protocol: the
//! connection is dropped from the pusher and removed from every room it was
//! a member of (normally exactly one).

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, RoomId, SessionRegistry};
use crate::usecase::RelayLock;

/// UseCase for cleaning up after a closed connection.
pub struct DisconnectUseCase {
    registry: Arc<dyn SessionRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
    relay: Arc<RelayLock>,
}

impl DisconnectUseCase {
    /// Create a new DisconnectUseCase.
    pub fn new(
        registry: Arc<dyn SessionRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
        relay: Arc<RelayLock>,
    ) -> Self {
        Self {
            registry,
            message_pusher,
            relay,
        }
    }

    /// Remove all traces of a connection. Returns the rooms it left.
    ///
    /// Runs under the relay lock so teardown never interleaves with an
    /// in-flight fan-out.
    pub async fn execute(&self, connection_id: ConnectionId) -> Vec<RoomId> {
        let _relay = self.relay.acquire().await;
        self.message_pusher
            .unregister_connection(&connection_id)
            .await;
        let left = self.registry.leave_all(&connection_id).await;
        tracing::info!(
            "Connection '{}' disconnected, left {} room(s)",
            connection_id,
            left.len()
        );
        left
    }
}
