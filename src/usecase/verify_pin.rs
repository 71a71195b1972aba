//! UseCase: room PIN verification.
//!
//! Gate a client's entry to a room before it opens the real-time
//! connection. On success the client learns where to fetch video from:
//! the local streamer path for local-file rooms, the remote URL otherwise.

use std::sync::Arc;

use crate::domain::{RoomId, RoomStore, VideoSource};

use super::error::VerifyPinError;

/// What a client needs after a successful PIN check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomAccess {
    /// `/stream/{room_id}` for local rooms, the remote URL otherwise
    pub video_url: String,
    pub is_local_file: bool,
}

/// UseCase for verifying room PINs.
pub struct VerifyPinUseCase {
    room_store: Arc<dyn RoomStore>,
}

impl VerifyPinUseCase {
    /// Create a new VerifyPinUseCase.
    pub fn new(room_store: Arc<dyn RoomStore>) -> Self {
        Self { room_store }
    }

    /// Check `pin` against the room's secret.
    ///
    /// The mismatch response is uniform regardless of the room's video
    /// source type.
    pub async fn execute(&self, room_id: &RoomId, pin: &str) -> Result<RoomAccess, VerifyPinError> {
        let record = self
            .room_store
            .find_room(room_id)
            .await?
            .ok_or(VerifyPinError::RoomNotFound)?;

        if record.pin != pin {
            return Err(VerifyPinError::PinMismatch);
        }

        Ok(match record.source {
            VideoSource::Remote(url) => RoomAccess {
                video_url: url,
                is_local_file: false,
            },
            VideoSource::LocalFile(_) => RoomAccess {
                video_url: format!("/stream/{room_id}"),
                is_local_file: true,
            },
        })
    }
}
