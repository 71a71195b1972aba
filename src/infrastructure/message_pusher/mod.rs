//! Outbound event delivery implementations.
//!
//! Concrete [`crate::domain::MessagePusher`] implementations. WebSocket
//! connections are accepted by the UI layer; this module only manages the
//! per-connection senders and pushes serialized events through them.

pub mod websocket;

pub use websocket::WebSocketMessagePusher;
