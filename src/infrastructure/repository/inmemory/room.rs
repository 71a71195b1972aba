//! In-memory room record store.
//!
//! Stands in for the external room-CRUD collaborator. The core only ever
//! reads room records; `insert` exists so the binary and tests can seed
//! rooms.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{RoomId, RoomRecord, RoomStore, StoreError};

/// In-memory [`RoomStore`] implementation.
pub struct InMemoryRoomStore {
    rooms: RwLock<HashMap<RoomId, RoomRecord>>,
}

impl InMemoryRoomStore {
    /// Create an empty room store.
    pub fn new() -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
        }
    }

    /// Seed a room record. Replaces any existing record with the same id.
    pub async fn insert(&self, record: RoomRecord) {
        let mut rooms = self.rooms.write().await;
        rooms.insert(record.id.clone(), record);
    }
}

impl Default for InMemoryRoomStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoomStore for InMemoryRoomStore {
    async fn find_room(&self, room_id: &RoomId) -> Result<Option<RoomRecord>, StoreError> {
        let rooms = self.rooms.read().await;
        Ok(rooms.get(room_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{UserId, VideoSource};

    fn record(id: &str) -> RoomRecord {
        RoomRecord {
            id: RoomId::new(id.to_string()).unwrap(),
            name: "Movie night".to_string(),
            source: VideoSource::Remote("https://example.com/v.mp4".to_string()),
            pin: "1234".to_string(),
            owner: UserId::new("alice".to_string()).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_find_room_returns_seeded_record() {
        // given:
        let store = InMemoryRoomStore::new();
        store.insert(record("r1")).await;

        // when:
        let found = store
            .find_room(&RoomId::new("r1".to_string()).unwrap())
            .await
            .unwrap();

        // then:
        let found = found.expect("room should exist");
        assert_eq!(found.name, "Movie night");
        assert_eq!(found.pin, "1234");
    }

    #[tokio::test]
    async fn test_find_room_returns_none_for_unknown_id() {
        // given:
        let store = InMemoryRoomStore::new();

        // when:
        let found = store
            .find_room(&RoomId::new("missing".to_string()).unwrap())
            .await
            .unwrap();

        // then:
        assert!(found.is_none());
    }
}
