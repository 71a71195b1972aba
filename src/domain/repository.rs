//! Collaborator traits the domain layer depends on.
//!
//! The usecase layer depends on these traits; the infrastructure layer
//! provides the concrete implementations (dependency inversion). External
//! collaborators (identity issuance, the room CRUD service) appear here only
//! as the narrow interfaces the core consumes.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use tokio::sync::mpsc;

use super::{
    entity::{ChatRecord, Principal, RoomRecord},
    error::{AuthError, StoreError},
    value_object::{ChatText, ConnectionId, PlaybackState, RoomId, UserId},
};

/// Channel used to push serialized events to a single connection.
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// Authoritative store of live playback state and membership per room.
///
/// All operations are total: they touch in-process memory only and never
/// error. Implementations must serialize every mutation together with its
/// broadcast-target decision (single-writer semantics), so no two
/// join/leave/state-change operations interleave partially.
#[async_trait]
pub trait SessionRegistry: Send + Sync {
    /// Add a connection to a room, lazily creating the session with default
    /// playback state. Idempotent.
    async fn join(&self, room_id: RoomId, connection_id: ConnectionId);

    /// Remove a connection from a room. When the member set empties, the
    /// session is discarded entirely, not archived.
    async fn leave(&self, room_id: &RoomId, connection_id: &ConnectionId);

    /// Remove a connection from every room it is a member of (normally
    /// exactly one). Returns the rooms it was removed from.
    async fn leave_all(&self, connection_id: &ConnectionId) -> Vec<RoomId>;

    /// Replace a room's playback state unconditionally (last write wins) and
    /// return the member set minus the originating connection for fan-out.
    /// Silently returns no targets when the room has no live session.
    async fn set_state(
        &self,
        room_id: &RoomId,
        state: PlaybackState,
        origin: &ConnectionId,
    ) -> Vec<ConnectionId>;

    /// Current playback state, or None when nobody is in the room.
    async fn get_state(&self, room_id: &RoomId) -> Option<PlaybackState>;

    /// All current members of a room.
    async fn members(&self, room_id: &RoomId) -> Vec<ConnectionId>;
}

/// Read-only lookup into the external room record store.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RoomStore: Send + Sync {
    /// Fetch a room record by id. `Ok(None)` when the room does not exist.
    async fn find_room(&self, room_id: &RoomId) -> Result<Option<RoomRecord>, StoreError>;
}

/// Durable, time-ordered storage of chat messages.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ChatStore: Send + Sync {
    /// Persist a message, assigning its server timestamp at the moment of
    /// storage. Timestamps are monotonically non-decreasing per room in
    /// insertion order.
    async fn append(
        &self,
        room_id: RoomId,
        author_id: UserId,
        author_name: String,
        text: ChatText,
    ) -> Result<ChatRecord, StoreError>;

    /// All messages for a room, ascending by server timestamp, for history
    /// replay on join.
    async fn list(&self, room_id: &RoomId) -> Result<Vec<ChatRecord>, StoreError>;
}

/// Capability check shared by the HTTP streaming path and the chat path:
/// raw token in, principal or failure out.
#[cfg_attr(test, automock)]
pub trait TokenVerifier: Send + Sync {
    /// Verify a token's signature and expiry, yielding the principal.
    fn verify(&self, token: &str) -> Result<Principal, AuthError>;
}

/// Outbound event delivery to connected clients.
///
/// Fan-out is fire-and-forget: per-target failures are tolerated and logged,
/// no delivery guarantee exists beyond best-effort in-order delivery to each
/// recipient individually.
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// Register a connection's outbound channel.
    async fn register_connection(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// Drop a connection's outbound channel.
    async fn unregister_connection(&self, connection_id: &ConnectionId);

    /// Push a serialized event to a single connection.
    async fn push_to(&self, connection_id: &ConnectionId, content: &str);

    /// Push a serialized event to every target connection.
    async fn broadcast(&self, targets: Vec<ConnectionId>, content: &str);
}
