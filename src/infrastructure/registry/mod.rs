//! In-memory session registry.
//!
//! The single source of truth for "who is watching what, at what playback
//! position, right now". One mutex guards the whole session map, so every
//! mutation and its broadcast-target decision happen in one critical
//! section; no two joins/leaves/state-changes interleave partially.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, PlaybackState, RoomId, RoomSession, SessionRegistry};

/// In-memory [`SessionRegistry`] implementation.
///
/// Sessions are created lazily on first join and discarded when the member
/// set empties. Nothing here survives a restart; the registry is a
/// resynchronizable cursor, not a record of truth.
pub struct InMemorySessionRegistry {
    sessions: Mutex<HashMap<RoomId, RoomSession>>,
}

impl InMemorySessionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemorySessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionRegistry for InMemorySessionRegistry {
    async fn join(&self, room_id: RoomId, connection_id: ConnectionId) {
        let mut sessions = self.sessions.lock().await;
        sessions
            .entry(room_id)
            .or_insert_with(RoomSession::new)
            .join(connection_id);
    }

    async fn leave(&self, room_id: &RoomId, connection_id: &ConnectionId) {
        let mut sessions = self.sessions.lock().await;
        if let Some(session) = sessions.get_mut(room_id) {
            if session.leave(connection_id) {
                sessions.remove(room_id);
                tracing::debug!("Room '{}' emptied, session discarded", room_id);
            }
        }
    }

    async fn leave_all(&self, connection_id: &ConnectionId) -> Vec<RoomId> {
        let mut sessions = self.sessions.lock().await;
        let mut left = Vec::new();
        sessions.retain(|room_id, session| {
            if session.members.contains(connection_id) {
                left.push(room_id.clone());
                !session.leave(connection_id)
            } else {
                true
            }
        });
        left
    }

    async fn set_state(
        &self,
        room_id: &RoomId,
        state: PlaybackState,
        origin: &ConnectionId,
    ) -> Vec<ConnectionId> {
        let mut sessions = self.sessions.lock().await;
        match sessions.get_mut(room_id) {
            Some(session) => {
                session.playback = state;
                session.members_except(origin)
            }
            // Update for a room nobody is in is silently dropped.
            None => Vec::new(),
        }
    }

    async fn get_state(&self, room_id: &RoomId) -> Option<PlaybackState> {
        let sessions = self.sessions.lock().await;
        sessions.get(room_id).map(|session| session.playback)
    }

    async fn members(&self, room_id: &RoomId) -> Vec<ConnectionId> {
        let sessions = self.sessions.lock().await;
        sessions
            .get(room_id)
            .map(|session| session.members.iter().copied().collect())
            .unwrap_or_default()
    }
}
