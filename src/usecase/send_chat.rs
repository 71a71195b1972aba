//! UseCase: chat message.
//!
//! Verifies the per-message auth token, persists the message (the store
//! assigns the server timestamp), and only then broadcasts it to every
//! member of the room, sender included, so the sender's own message renders
//! from the same authoritative path as everyone else's. Append and fan-out
//! run under the gateway's relay lock: the order live recipients observe is
//! the persistence order.
//!
//! Persistence happens-before broadcast: a failed append suppresses the
//! broadcast, and the sender gets no failure notice. That gap is
//! intentional, inherited behavior; do not add an acknowledgment channel
//! here without revisiting the protocol.

use std::sync::Arc;

use crate::domain::{
    ChatRecord, ChatStore, ChatText, MessagePusher, RoomId, SessionRegistry, TokenVerifier,
};
use crate::usecase::RelayLock;

use super::error::SendChatError;

/// UseCase for authorizing, persisting and broadcasting chat messages.
pub struct SendChatUseCase {
    token_verifier: Arc<dyn TokenVerifier>,
    chat_store: Arc<dyn ChatStore>,
    registry: Arc<dyn SessionRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
    relay: Arc<RelayLock>,
}

impl SendChatUseCase {
    /// Create a new SendChatUseCase.
    pub fn new(
        token_verifier: Arc<dyn TokenVerifier>,
        chat_store: Arc<dyn ChatStore>,
        registry: Arc<dyn SessionRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
        relay: Arc<RelayLock>,
    ) -> Self {
        Self {
            token_verifier,
            chat_store,
            registry,
            message_pusher,
            relay,
        }
    }

    /// Verify a chat message, persist it, and broadcast the event rendered
    /// by `render` to every member of the room, including the sender.
    /// Returns the stored record with its server-assigned timestamp and
    /// resolved author name.
    ///
    /// `render` keeps wire serialization with the caller; it runs after the
    /// append, inside the same critical section as the fan-out.
    ///
    /// Errors are absorbed by the caller (logged, never surfaced to the
    /// sender); playback sync on the same connection is unaffected.
    pub async fn execute<F>(
        &self,
        room_id: RoomId,
        text: String,
        auth_token: &str,
        render: F,
    ) -> Result<ChatRecord, SendChatError>
    where
        F: FnOnce(&ChatRecord) -> String,
    {
        let principal = self.token_verifier.verify(auth_token)?;
        let text = ChatText::new(text)?;

        let _relay = self.relay.acquire().await;

        let record = self
            .chat_store
            .append(room_id.clone(), principal.user_id, principal.name, text)
            .await?;

        let targets = self.registry.members(&room_id).await;
        if !targets.is_empty() {
            let json_event = render(&record);
            self.message_pusher.broadcast(targets, &json_event).await;
        }

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::time::FixedClock;
    use crate::domain::{AuthError, ConnectionId, MockChatStore, PusherChannel, StoreError};
    use crate::domain::{Principal, UserId};
    use crate::infrastructure::token::{SignedTokenVerifier, issue_token};
    use crate::infrastructure::{InMemoryChatStore, InMemorySessionRegistry, WebSocketMessagePusher};
    use async_trait::async_trait;
    use std::time::Duration;
    use tokio::sync::{Mutex, mpsc};

    const SECRET: &str = "test-secret";

    fn room(id: &str) -> RoomId {
        RoomId::new(id.to_string()).unwrap()
    }

    fn alice_token(expires_at: i64) -> String {
        issue_token(
            SECRET,
            &Principal {
                user_id: UserId::new("alice".to_string()).unwrap(),
                name: "Alice".to_string(),
            },
            expires_at,
        )
    }

    struct Fixture {
        usecase: SendChatUseCase,
        registry: Arc<InMemorySessionRegistry>,
        pusher: Arc<WebSocketMessagePusher>,
        chat_store: Arc<InMemoryChatStore>,
    }

    fn fixture() -> Fixture {
        let clock = Arc::new(FixedClock::new(1000));
        let registry = Arc::new(InMemorySessionRegistry::new());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let chat_store = Arc::new(InMemoryChatStore::new(clock.clone()));
        let verifier = Arc::new(SignedTokenVerifier::new(SECRET.to_string(), clock));
        let usecase = SendChatUseCase::new(
            verifier,
            chat_store.clone(),
            registry.clone(),
            pusher.clone(),
            Arc::new(RelayLock::new()),
        );
        Fixture {
            usecase,
            registry,
            pusher,
            chat_store,
        }
    }

    #[tokio::test]
    async fn test_valid_message_is_persisted_with_server_timestamp() {
        // given:
        let f = fixture();

        // when:
        let record = f
            .usecase
            .execute(
                room("r1"),
                "hello".to_string(),
                &alice_token(2000),
                |record| record.text.as_str().to_string(),
            )
            .await
            .unwrap();

        // then:
        assert_eq!(record.server_timestamp, 1000);
        assert_eq!(record.author_name, "Alice");
        let stored = f.chat_store.list(&room("r1")).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].text.as_str(), "hello");
    }

    #[tokio::test]
    async fn test_broadcast_includes_the_sender() {
        // given: sender and one other member
        let f = fixture();
        let sender = ConnectionId::generate();
        let other = ConnectionId::generate();
        let (tx_s, mut rx_s) = mpsc::unbounded_channel();
        let (tx_o, mut rx_o) = mpsc::unbounded_channel();
        f.pusher.register_connection(sender, tx_s).await;
        f.pusher.register_connection(other, tx_o).await;
        f.registry.join(room("r1"), sender).await;
        f.registry.join(room("r1"), other).await;

        // when:
        f.usecase
            .execute(room("r1"), "hello".to_string(), &alice_token(2000), |_| {
                "chat event".to_string()
            })
            .await
            .unwrap();

        // then: both receive it
        assert_eq!(rx_s.recv().await, Some("chat event".to_string()));
        assert_eq!(rx_o.recv().await, Some("chat event".to_string()));
    }

    #[tokio::test]
    async fn test_expired_token_produces_no_record() {
        // given: token already expired at clock time 1000
        let f = fixture();

        // when:
        let result = f
            .usecase
            .execute(room("r1"), "hello".to_string(), &alice_token(500), |_| {
                String::new()
            })
            .await;

        // then: auth error, nothing persisted
        assert!(matches!(
            result.unwrap_err(),
            SendChatError::Auth(AuthError::Expired { .. })
        ));
        assert!(f.chat_store.list(&room("r1")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_auth_failure_leaves_playback_sync_unaffected() {
        // given: a member whose chat token is garbage
        let f = fixture();
        let a = ConnectionId::generate();
        let b = ConnectionId::generate();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();
        f.pusher.register_connection(b, tx_b).await;
        f.registry.join(room("r1"), a).await;
        f.registry.join(room("r1"), b).await;

        // when: the chat message is rejected...
        let result = f
            .usecase
            .execute(room("r1"), "hello".to_string(), "bogus", |_| String::new())
            .await;
        assert!(matches!(result.unwrap_err(), SendChatError::Auth(_)));

        // ...and a playback change on the same room follows
        let targets = f
            .registry
            .set_state(
                &room("r1"),
                crate::domain::PlaybackState {
                    is_playing: true,
                    position_seconds: 1.0,
                },
                &a,
            )
            .await;
        f.pusher.broadcast(targets, "state update").await;

        // then: the playback update still fans out
        assert_eq!(rx_b.recv().await, Some("state update".to_string()));
    }

    #[tokio::test]
    async fn test_store_failure_suppresses_the_broadcast() {
        // given: a chat store that rejects appends, and one live member
        let clock = Arc::new(FixedClock::new(1000));
        let registry = Arc::new(InMemorySessionRegistry::new());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let verifier = Arc::new(SignedTokenVerifier::new(SECRET.to_string(), clock));
        let mut chat_store = MockChatStore::new();
        chat_store
            .expect_append()
            .returning(|_, _, _, _| Err(StoreError::Backend("disk full".to_string())));
        let usecase = SendChatUseCase::new(
            verifier,
            Arc::new(chat_store),
            registry.clone(),
            pusher.clone(),
            Arc::new(RelayLock::new()),
        );
        let member = ConnectionId::generate();
        let (tx, mut rx) = mpsc::unbounded_channel();
        pusher.register_connection(member, tx).await;
        registry.join(room("r1"), member).await;

        // when:
        let result = usecase
            .execute(room("r1"), "hello".to_string(), &alice_token(2000), |_| {
                "chat event".to_string()
            })
            .await;

        // then: persistence error, nothing delivered
        assert!(matches!(result.unwrap_err(), SendChatError::Persistence(_)));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_empty_text_is_rejected() {
        // given:
        let f = fixture();

        // when:
        let result = f
            .usecase
            .execute(room("r1"), String::new(), &alice_token(2000), |_| {
                String::new()
            })
            .await;

        // then:
        assert!(matches!(result.unwrap_err(), SendChatError::InvalidText(_)));
        assert!(f.chat_store.list(&room("r1")).await.unwrap().is_empty());
    }

    /// Pusher that snapshots the store at the moment of each fan-out, and
    /// stalls on request to widen any gap between append and enqueue.
    struct SnapshottingPusher {
        chat_store: Arc<InMemoryChatStore>,
        room_id: RoomId,
        observed: Arc<Mutex<Vec<(String, Vec<String>)>>>,
        stall_on: Option<String>,
    }

    #[async_trait]
    impl MessagePusher for SnapshottingPusher {
        async fn register_connection(&self, _connection_id: ConnectionId, _channel: PusherChannel) {
        }

        async fn unregister_connection(&self, _connection_id: &ConnectionId) {}

        async fn push_to(&self, _connection_id: &ConnectionId, _content: &str) {}

        async fn broadcast(&self, _targets: Vec<ConnectionId>, content: &str) {
            if self.stall_on.as_deref() == Some(content) {
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
            let listed = self
                .chat_store
                .list(&self.room_id)
                .await
                .unwrap()
                .into_iter()
                .map(|record| record.text.as_str().to_string())
                .collect();
            self.observed
                .lock()
                .await
                .push((content.to_string(), listed));
        }
    }

    struct SnapshotFixture {
        usecase: SendChatUseCase,
        registry: Arc<InMemorySessionRegistry>,
        chat_store: Arc<InMemoryChatStore>,
        observed: Arc<Mutex<Vec<(String, Vec<String>)>>>,
    }

    fn snapshot_fixture(stall_on: Option<String>) -> SnapshotFixture {
        let clock = Arc::new(FixedClock::new(1000));
        let registry = Arc::new(InMemorySessionRegistry::new());
        let chat_store = Arc::new(InMemoryChatStore::new(clock.clone()));
        let observed = Arc::new(Mutex::new(Vec::new()));
        let pusher = Arc::new(SnapshottingPusher {
            chat_store: chat_store.clone(),
            room_id: room("r1"),
            observed: observed.clone(),
            stall_on,
        });
        let verifier = Arc::new(SignedTokenVerifier::new(SECRET.to_string(), clock));
        let usecase = SendChatUseCase::new(
            verifier,
            chat_store.clone(),
            registry.clone(),
            pusher,
            Arc::new(RelayLock::new()),
        );
        SnapshotFixture {
            usecase,
            registry,
            chat_store,
            observed,
        }
    }

    #[tokio::test]
    async fn test_record_is_listed_before_the_first_push() {
        // given: one live member and a pusher that snapshots the store
        let f = snapshot_fixture(None);
        f.registry.join(room("r1"), ConnectionId::generate()).await;

        // when:
        f.usecase
            .execute(
                room("r1"),
                "hello".to_string(),
                &alice_token(2000),
                |record| record.text.as_str().to_string(),
            )
            .await
            .unwrap();

        // then: at the moment of the push the record was already persisted
        let observed = f.observed.lock().await;
        assert_eq!(observed.len(), 1);
        assert_eq!(observed[0].0, "hello");
        assert_eq!(observed[0].1, vec!["hello".to_string()]);
    }

    #[tokio::test]
    async fn test_concurrent_messages_are_delivered_in_persistence_order() {
        // given: one live member and a pusher that stalls while fanning out
        // the first message
        let f = snapshot_fixture(Some("first".to_string()));
        f.registry.join(room("r1"), ConnectionId::generate()).await;
        let usecase = Arc::new(f.usecase);

        // when: a second message arrives while the first is still in flight
        let usecase_a = usecase.clone();
        let first = tokio::spawn(async move {
            usecase_a
                .execute(
                    room("r1"),
                    "first".to_string(),
                    &alice_token(2000),
                    |record| record.text.as_str().to_string(),
                )
                .await
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        let usecase_b = usecase.clone();
        let second = tokio::spawn(async move {
            usecase_b
                .execute(
                    room("r1"),
                    "second".to_string(),
                    &alice_token(2000),
                    |record| record.text.as_str().to_string(),
                )
                .await
        });
        first.await.unwrap().unwrap();
        second.await.unwrap().unwrap();

        // then: delivery order matches the store's order, and each push saw
        // its own record already listed
        let observed = f.observed.lock().await;
        assert_eq!(observed[0].0, "first");
        assert_eq!(observed[0].1, vec!["first".to_string()]);
        assert_eq!(observed[1].0, "second");
        assert_eq!(
            observed[1].1,
            vec!["first".to_string(), "second".to_string()]
        );
        let stored: Vec<String> = f
            .chat_store
            .list(&room("r1"))
            .await
            .unwrap()
            .into_iter()
            .map(|record| record.text.as_str().to_string())
            .collect();
        assert_eq!(stored, vec!["first".to_string(), "second".to_string()]);
    }
}
