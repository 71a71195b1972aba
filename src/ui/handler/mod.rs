//! Request handlers.

mod http;
mod stream;
mod websocket;

pub use http::{health_check, verify_pin};
pub use stream::stream_video;
pub use websocket::websocket_handler;
