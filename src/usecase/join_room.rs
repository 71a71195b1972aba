//! UseCase: join a room.
//!
//! Registers membership in the session registry, assembles the
//! resynchronization snapshot (current playback state plus full chat
//! history) and pushes it to the joiner. Join and replay run under the
//! gateway's relay lock: a chat message relayed concurrently lands either in
//! the replayed history or in the joiner's live channel, never both, and
//! never the live event before the replay.

use std::sync::Arc;

use crate::domain::{
    ChatRecord, ChatStore, ConnectionId, MessagePusher, PlaybackState, RoomId, SessionRegistry,
};
use crate::usecase::RelayLock;

/// UseCase for joining a room.
pub struct JoinRoomUseCase {
    registry: Arc<dyn SessionRegistry>,
    chat_store: Arc<dyn ChatStore>,
    message_pusher: Arc<dyn MessagePusher>,
    relay: Arc<RelayLock>,
}

impl JoinRoomUseCase {
    /// Create a new JoinRoomUseCase.
    pub fn new(
        registry: Arc<dyn SessionRegistry>,
        chat_store: Arc<dyn ChatStore>,
        message_pusher: Arc<dyn MessagePusher>,
        relay: Arc<RelayLock>,
    ) -> Self {
        Self {
            registry,
            chat_store,
            message_pusher,
            relay,
        }
    }

    /// Join `connection_id` to `room_id`, push the snapshot rendered by
    /// `render` to the joiner, and return the snapshot.
    ///
    /// The registry join is total. A failed history fetch is logged and
    /// replayed as an empty history so the connection stays usable.
    pub async fn execute<F>(
        &self,
        room_id: RoomId,
        connection_id: ConnectionId,
        render: F,
    ) -> (PlaybackState, Vec<ChatRecord>)
    where
        F: FnOnce(&PlaybackState, &[ChatRecord]) -> String,
    {
        let _relay = self.relay.acquire().await;

        self.registry.join(room_id.clone(), connection_id).await;

        // Join created the session if it was missing, so state is present.
        let state = self
            .registry
            .get_state(&room_id)
            .await
            .unwrap_or_default();

        let history = match self.chat_store.list(&room_id).await {
            Ok(history) => history,
            Err(e) => {
                tracing::error!("Failed to load chat history for room '{}': {}", room_id, e);
                Vec::new()
            }
        };

        let replay = render(&state, &history);
        self.message_pusher.push_to(&connection_id, &replay).await;

        (state, history)
    }
}
