//! UseCase: playback state change.
//!
//! Applies the new state to the registry (last write wins, no
//! reconciliation between near-simultaneous senders) and fans the update out
//! to every other member of the room. Fire-and-forget: no acknowledgment,
//! no delivery guarantee beyond best-effort in-order delivery per recipient.

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, PlaybackState, RoomId, SessionRegistry};
use crate::usecase::RelayLock;

/// UseCase for relaying playback state changes.
pub struct UpdatePlaybackUseCase {
    registry: Arc<dyn SessionRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
    relay: Arc<RelayLock>,
}

impl UpdatePlaybackUseCase {
    /// Create a new UpdatePlaybackUseCase.
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

    /// Apply `state` to the room and broadcast `json_event` to every member
    /// except `origin`. Returns the connections that were targeted.
    ///
    /// State application and fan-out form one critical section, so recipients
    /// observe updates in the order the server applied them.
    ///
    /// A change for a room nobody is in updates nothing and targets nobody.
    pub async fn execute(
        &self,
        room_id: &RoomId,
        state: PlaybackState,
        origin: &ConnectionId,
        json_event: &str,
    ) -> Vec<ConnectionId> {
        let _relay = self.relay.acquire().await;

        let targets = self.registry.set_state(room_id, state, origin).await;

        if !targets.is_empty() {
            self.message_pusher
                .broadcast(targets.clone(), json_event)
                .await;
        }

        targets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PusherChannel;
    use crate::infrastructure::{InMemorySessionRegistry, WebSocketMessagePusher};
    use async_trait::async_trait;
    use std::time::Duration;
    use tokio::sync::{Mutex, mpsc};

    fn room(id: &str) -> RoomId {
        RoomId::new(id.to_string()).unwrap()
    }

    fn usecase_with(
        registry: Arc<InMemorySessionRegistry>,
        pusher: Arc<dyn MessagePusher>,
    ) -> UpdatePlaybackUseCase {
        UpdatePlaybackUseCase::new(registry, pusher, Arc::new(RelayLock::new()))
    }

    #[tokio::test]
    async fn test_update_reaches_all_members_except_origin() {
        // given: three members of one room
        let registry = Arc::new(InMemorySessionRegistry::new());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let usecase = usecase_with(registry.clone(), pusher.clone());

        let a = ConnectionId::generate();
        let b = ConnectionId::generate();
        let c = ConnectionId::generate();
        let (tx_a, mut rx_a) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();
        let (tx_c, mut rx_c) = mpsc::unbounded_channel();
        pusher.register_connection(a, tx_a).await;
        pusher.register_connection(b, tx_b).await;
        pusher.register_connection(c, tx_c).await;
        registry.join(room("r1"), a).await;
        registry.join(room("r1"), b).await;
        registry.join(room("r1"), c).await;

        // when: a changes the playback state
        let state = PlaybackState {
            is_playing: true,
            position_seconds: 60.0,
        };
        let targets = usecase.execute(&room("r1"), state, &a, "update").await;

        // then: exactly the two others receive it
        assert_eq!(targets.len(), 2);
        assert_eq!(rx_b.recv().await, Some("update".to_string()));
        assert_eq!(rx_c.recv().await, Some("update".to_string()));
        assert!(rx_a.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_update_for_unoccupied_room_targets_nobody() {
        // given:
        let registry = Arc::new(InMemorySessionRegistry::new());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let usecase = usecase_with(registry.clone(), pusher);

        // when:
        let targets = usecase
            .execute(
                &room("ghost"),
                PlaybackState::default(),
                &ConnectionId::generate(),
                "update",
            )
            .await;

        // then:
        assert!(targets.is_empty());
        assert!(registry.get_state(&room("ghost")).await.is_none());
    }

    #[tokio::test]
    async fn test_sole_member_update_is_applied_but_not_broadcast() {
        // given: the origin is the only member
        let registry = Arc::new(InMemorySessionRegistry::new());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let usecase = usecase_with(registry.clone(), pusher);
        let a = ConnectionId::generate();
        registry.join(room("r1"), a).await;

        // when:
        let state = PlaybackState {
            is_playing: true,
            position_seconds: 5.0,
        };
        let targets = usecase.execute(&room("r1"), state, &a, "update").await;

        // then: state stored, nobody targeted
        assert!(targets.is_empty());
        assert!(registry.get_state(&room("r1")).await.unwrap().is_playing);
    }

    /// Pusher that stalls inside the first fan-out, exposing any gap between
    /// state application and enqueue.
    struct StallingPusher {
        log: Arc<Mutex<Vec<String>>>,
        stall_on: String,
    }

    #[async_trait]
    impl MessagePusher for StallingPusher {
        async fn register_connection(&self, _connection_id: ConnectionId, _channel: PusherChannel) {
        }

        async fn unregister_connection(&self, _connection_id: &ConnectionId) {}

        async fn push_to(&self, _connection_id: &ConnectionId, _content: &str) {}

        async fn broadcast(&self, _targets: Vec<ConnectionId>, content: &str) {
            if content == self.stall_on {
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
            self.log.lock().await.push(content.to_string());
        }
    }

    #[tokio::test]
    async fn test_concurrent_updates_are_delivered_in_application_order() {
        // given: two senders and an observer in one room, with a pusher
        // that stalls while fanning out the first update
        let registry = Arc::new(InMemorySessionRegistry::new());
        let log = Arc::new(Mutex::new(Vec::new()));
        let pusher = Arc::new(StallingPusher {
            log: log.clone(),
            stall_on: "update-a".to_string(),
        });
        let usecase = Arc::new(usecase_with(registry.clone(), pusher));

        let a = ConnectionId::generate();
        let b = ConnectionId::generate();
        let observer = ConnectionId::generate();
        registry.join(room("r1"), a).await;
        registry.join(room("r1"), b).await;
        registry.join(room("r1"), observer).await;

        // when: a's change arrives first, b's shortly after while a's
        // fan-out is still in flight
        let usecase_a = usecase.clone();
        let first = tokio::spawn(async move {
            let state = PlaybackState {
                is_playing: true,
                position_seconds: 10.0,
            };
            usecase_a.execute(&room("r1"), state, &a, "update-a").await
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        let usecase_b = usecase.clone();
        let second = tokio::spawn(async move {
            let state = PlaybackState {
                is_playing: false,
                position_seconds: 20.0,
            };
            usecase_b.execute(&room("r1"), state, &b, "update-b").await
        });
        first.await.unwrap();
        second.await.unwrap();

        // then: the observer sees the updates in application order, and the
        // registry holds the later state
        assert_eq!(
            *log.lock().await,
            vec!["update-a".to_string(), "update-b".to_string()]
        );
        let held = registry.get_state(&room("r1")).await.unwrap();
        assert_eq!(held.position_seconds, 20.0);
        assert!(!held.is_playing);
    }
}
