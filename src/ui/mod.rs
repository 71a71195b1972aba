//! UI layer: the HTTP/WebSocket surface of the server.

mod error;
mod handler;
mod server;
mod signal;
pub mod state;

pub use error::ApiError;
pub use server::{Server, app};
