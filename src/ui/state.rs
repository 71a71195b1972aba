//! Shared application state.

use std::sync::Arc;

use crate::domain::{MessagePusher, RoomStore, SessionRegistry, TokenVerifier};
use crate::usecase::{
    DisconnectUseCase, JoinRoomUseCase, SendChatUseCase, UpdatePlaybackUseCase, VerifyPinUseCase,
};

/// Shared application state, injected into every handler.
///
/// The registry and pusher are owned here and handed to the gateway and
/// streamer explicitly, never referenced as ambient globals.
pub struct AppState {
    /// UseCase for joining a room
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    /// UseCase for relaying playback state changes
    pub update_playback_usecase: Arc<UpdatePlaybackUseCase>,
    /// UseCase for chat messages
    pub send_chat_usecase: Arc<SendChatUseCase>,
    /// UseCase for connection teardown
    pub disconnect_usecase: Arc<DisconnectUseCase>,
    /// UseCase for PIN verification
    pub verify_pin_usecase: Arc<VerifyPinUseCase>,
    /// Live session registry (membership + playback state)
    pub registry: Arc<dyn SessionRegistry>,
    /// External room record store
    pub room_store: Arc<dyn RoomStore>,
    /// Capability check shared by the chat and streaming paths
    pub token_verifier: Arc<dyn TokenVerifier>,
    /// Outbound event delivery
    pub message_pusher: Arc<dyn MessagePusher>,
}
