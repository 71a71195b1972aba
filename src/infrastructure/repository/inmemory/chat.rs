//! In-memory chat store.
//!
//! Append-only, per-room message log. The server timestamp is assigned here,
//! at the moment of storage, and is clamped to never run backwards within a
//! room even if the wall clock does.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::common::time::Clock;
use crate::domain::{ChatRecord, ChatStore, ChatText, RoomId, StoreError, UserId};

/// In-memory [`ChatStore`] implementation.
pub struct InMemoryChatStore {
    clock: Arc<dyn Clock>,
    messages: Mutex<HashMap<RoomId, Vec<ChatRecord>>>,
}

impl InMemoryChatStore {
    /// Create an empty chat store using the given clock for timestamp
    /// assignment.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            messages: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl ChatStore for InMemoryChatStore {
    async fn append(
        &self,
        room_id: RoomId,
        author_id: UserId,
        author_name: String,
        text: ChatText,
    ) -> Result<ChatRecord, StoreError> {
        let mut messages = self.messages.lock().await;
        let log = messages.entry(room_id.clone()).or_default();

        // Monotonic per room: never earlier than the previous record.
        let now = self.clock.now_utc_millis();
        let server_timestamp = match log.last() {
            Some(last) => now.max(last.server_timestamp),
            None => now,
        };

        let record = ChatRecord {
            room_id,
            author_id,
            author_name,
            text,
            server_timestamp,
        };
        log.push(record.clone());
        Ok(record)
    }

    async fn list(&self, room_id: &RoomId) -> Result<Vec<ChatRecord>, StoreError> {
        let messages = self.messages.lock().await;
        Ok(messages.get(room_id).cloned().unwrap_or_default())
    }
}
