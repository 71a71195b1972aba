//! Infrastructure layer: concrete implementations of the domain's
//! collaborator traits, plus wire-format DTOs.

pub mod dto;
pub mod message_pusher;
pub mod registry;
pub mod repository;
pub mod token;

pub use message_pusher::WebSocketMessagePusher;
pub use registry::InMemorySessionRegistry;
pub use repository::{InMemoryChatStore, InMemoryRoomStore};
pub use token::SignedTokenVerifier;
