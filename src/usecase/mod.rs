//! UseCase layer.
//!
//! One struct per gateway operation. UseCases are called from the UI layer
//! and orchestrate the domain's collaborator traits; they never touch
//! sockets or HTTP types directly.

pub mod disconnect;
pub mod error;
pub mod join_room;
pub mod relay;
pub mod send_chat;
pub mod update_playback;
pub mod verify_pin;

pub use disconnect::DisconnectUseCase;
pub use error::{SendChatError, VerifyPinError};
pub use join_room::JoinRoomUseCase;
pub use relay::RelayLock;
pub use send_chat::SendChatUseCase;
pub use update_playback::UpdatePlaybackUseCase;
pub use verify_pin::{RoomAccess, VerifyPinUseCase};
