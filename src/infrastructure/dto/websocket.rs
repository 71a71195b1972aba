//! Real-time event DTOs exchanged over the WebSocket connection.

use serde::{Deserialize, Serialize};

use crate::domain::{ChatRecord, PlaybackState};

/// Events a client sends to the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientEvent {
    /// Register membership in a room; triggers state + history replay.
    JoinRoom {
        room_id: String,
    },
    /// Update the room's shared playback cursor.
    PlaybackStateChange {
        room_id: String,
        playback_state: PlaybackState,
    },
    /// Send a chat message. The token is re-verified per message.
    ChatMessage {
        room_id: String,
        text: String,
        auth_token: String,
    },
}

/// Events the server pushes to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// Sent to the joiner only: current state plus full chat history.
    RoomJoined {
        playback_state: PlaybackState,
        history: Vec<ChatMessageDto>,
    },
    /// Sent to every room member except the connection that changed state.
    PlaybackStateUpdate {
        playback_state: PlaybackState,
    },
    /// Sent to every room member, including the sender.
    ChatMessage {
        text: String,
        author_name: String,
        server_timestamp: i64,
    },
}

/// A chat message as rendered to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessageDto {
    pub text: String,
    pub author_name: String,
    /// Unix timestamp (UTC milliseconds) assigned at persistence time
    pub server_timestamp: i64,
}

impl From<ChatRecord> for ChatMessageDto {
    fn from(record: ChatRecord) -> Self {
        Self {
            text: record.text.into_string(),
            author_name: record.author_name,
            server_timestamp: record.server_timestamp,
        }
    }
}
