//! Core domain models for the watch-party server.

use std::collections::HashSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::value_object::{ChatText, ConnectionId, PlaybackState, RoomId, UserId};

/// Where a room's video comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoSource {
    /// A remote URL the client fetches directly
    Remote(String),
    /// A local file served through the range streamer
    LocalFile(PathBuf),
}

impl VideoSource {
    /// Whether this source is served by the local range streamer.
    pub fn is_local_file(&self) -> bool {
        matches!(self, VideoSource::LocalFile(_))
    }
}

/// Persistent room record owned by the external room-CRUD collaborator.
///
/// The core only reads these; creation, update and deletion happen outside.
#[derive(Debug, Clone)]
pub struct RoomRecord {
    /// Room identifier
    pub id: RoomId,
    /// Display name
    pub name: String,
    /// Video source (remote URL or local file)
    pub source: VideoSource,
    /// Shared secret gating entry to the room
    pub pin: String,
    /// Owning user
    pub owner: UserId,
}

/// Ephemeral per-room session: the live playback cursor plus the set of
/// connected members.
///
/// Exists only while at least one connection is joined; lost on restart by
/// design, since it is a resynchronizable cursor rather than a record of
/// truth.
#[derive(Debug, Clone)]
pub struct RoomSession {
    /// Most recently accepted playback state
    pub playback: PlaybackState,
    /// Currently joined connections
    pub members: HashSet<ConnectionId>,
}

impl RoomSession {
    /// Create a fresh session with default (paused, position 0) state.
    pub fn new() -> Self {
        Self {
            playback: PlaybackState::default(),
            members: HashSet::new(),
        }
    }

    /// Add a member. Idempotent.
    pub fn join(&mut self, connection_id: ConnectionId) {
        self.members.insert(connection_id);
    }

    /// Remove a member. Returns true if the session is now empty and should
    /// be discarded.
    pub fn leave(&mut self, connection_id: &ConnectionId) -> bool {
        self.members.remove(connection_id);
        self.members.is_empty()
    }

    /// All members except the given connection, for sender-excluded fan-out.
    pub fn members_except(&self, exclude: &ConnectionId) -> Vec<ConnectionId> {
        self.members
            .iter()
            .filter(|id| *id != exclude)
            .copied()
            .collect()
    }
}

impl Default for RoomSession {
    fn default() -> Self {
        Self::new()
    }
}

/// A stored chat message.
///
/// `server_timestamp` is assigned at persistence time and is the single
/// timestamp echoed to all recipients and returned on history queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRecord {
    /// Room the message belongs to
    pub room_id: RoomId,
    /// Author account
    pub author_id: UserId,
    /// Display name resolved from the author's verified token
    pub author_name: String,
    /// Message body
    pub text: ChatText,
    /// Unix timestamp (UTC milliseconds) assigned at persistence time
    pub server_timestamp: i64,
}

/// Authenticated identity derived from a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// Account identifier
    pub user_id: UserId,
    /// Display name shown alongside chat messages
    pub name: String,
}
