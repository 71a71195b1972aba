//! In-memory store implementations backed by `HashMap`s.

pub mod chat;
pub mod room;

pub use chat::InMemoryChatStore;
pub use room::InMemoryRoomStore;
