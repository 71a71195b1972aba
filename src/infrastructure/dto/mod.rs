//! Data Transfer Objects for the watch-party server.
//!
//! DTOs are organized by protocol:
//! - `websocket`: real-time event DTOs
//! - `http`: HTTP API request/response DTOs

pub mod http;
pub mod websocket;
