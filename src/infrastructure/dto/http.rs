//! HTTP API request/response DTOs.

use serde::{Deserialize, Serialize};

/// Body of `POST /rooms/{room_id}/verify-pin`.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyPinRequest {
    pub pin: String,
}

/// Successful verify-pin response: tells the client where to fetch video
/// from and whether that is the local range streamer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyPinResponse {
    /// Either the room's remote URL or the local `/stream/{room_id}` path
    pub video_url: String,
    pub is_local_file: bool,
}

/// Structured error body for HTTP-facing failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
