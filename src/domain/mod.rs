//! Domain layer for the watch-party server.
//!
//! This module contains business logic that is independent of
//! data transfer objects (DTOs) and infrastructure concerns.

pub mod entity;
pub mod error;
pub mod repository;
pub mod value_object;

pub use entity::{ChatRecord, Principal, RoomRecord, RoomSession, VideoSource};
pub use error::{AuthError, StoreError, ValueObjectError};
pub use repository::{
    ChatStore, MessagePusher, PusherChannel, RoomStore, SessionRegistry, TokenVerifier,
};
#[cfg(test)]
pub use repository::{MockChatStore, MockRoomStore};
pub use value_object::{ChatText, ConnectionId, PlaybackState, RoomId, UserId};
