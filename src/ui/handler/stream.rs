//! Byte-range video streaming.
//!
//! Serves a room's local video file with partial-content support so clients
//! can seek. Bodies are streamed in bounded chunks; the requested window is
//! never buffered whole. Each request is independent: no shared mutable
//! state exists on this path.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::Response,
};
use tokio::io::{AsyncReadExt, AsyncSeekExt, SeekFrom};
use tokio_util::io::ReaderStream;

use crate::domain::{RoomId, VideoSource};
use crate::ui::{error::ApiError, state::AppState};

/// Read buffer size for streamed bodies.
const STREAM_CHUNK_BYTES: usize = 64 * 1024;

/// `GET /stream/{room_id}` — stream a local-file room's video.
///
/// Requires a bearer token. A well-formed `Range: bytes=<start>-<end?>`
/// header yields a 206 with exactly the clamped byte window; no header, or a
/// malformed one, falls back to a 200 with the full file.
pub async fn stream_video(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let token = bearer_token(&headers)?;
    state.token_verifier.verify(token)?;

    let room_id =
        RoomId::new(room_id).map_err(|e| ApiError::NotFound(format!("invalid room id: {e}")))?;

    let record = state
        .room_store
        .find_room(&room_id)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .ok_or_else(|| ApiError::NotFound("room not found".to_string()))?;

    let path = match record.source {
        VideoSource::LocalFile(path) => path,
        VideoSource::Remote(_) => {
            return Err(ApiError::NotFound("room has no local video".to_string()));
        }
    };

    let file_size = tokio::fs::metadata(&path)
        .await
        .map_err(|_| ApiError::NotFound("video file missing".to_string()))?
        .len();

    let mut file = tokio::fs::File::open(&path)
        .await
        .map_err(|e| ApiError::Internal(format!("failed to open video file: {e}")))?;

    let content_type = content_type_for(&path);
    let range = headers
        .get(header::RANGE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| parse_range(value, file_size));

    match range {
        Some((start, end)) => {
            let chunk_size = end - start + 1;
            file.seek(SeekFrom::Start(start))
                .await
                .map_err(|e| ApiError::Internal(format!("seek failed: {e}")))?;
            let body = Body::from_stream(ReaderStream::with_capacity(
                file.take(chunk_size),
                STREAM_CHUNK_BYTES,
            ));

            tracing::debug!(
                "Streaming room '{}': bytes {}-{}/{}",
                room_id,
                start,
                end,
                file_size
            );
            Response::builder()
                .status(StatusCode::PARTIAL_CONTENT)
                .header(header::CONTENT_TYPE, content_type)
                .header(header::ACCEPT_RANGES, "bytes")
                .header(
                    header::CONTENT_RANGE,
                    format!("bytes {start}-{end}/{file_size}"),
                )
                .header(header::CONTENT_LENGTH, chunk_size)
                .body(body)
                .map_err(|e| ApiError::Internal(e.to_string()))
        }
        None => {
            let body = Body::from_stream(ReaderStream::with_capacity(file, STREAM_CHUNK_BYTES));

            tracing::debug!("Streaming room '{}': full file ({file_size} bytes)", room_id);
            Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, content_type)
                .header(header::ACCEPT_RANGES, "bytes")
                .header(header::CONTENT_LENGTH, file_size)
                .body(body)
                .map_err(|e| ApiError::Internal(e.to_string()))
        }
    }
}

/// Map the video file's extension to a MIME type, falling back to
/// `application/octet-stream` for anything unrecognized.
fn content_type_for(path: &std::path::Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());
    match ext.as_deref() {
        Some("mp4" | "m4v") => "video/mp4",
        Some("webm") => "video/webm",
        Some("mkv") => "video/x-matroska",
        Some("mov") => "video/quicktime",
        Some("avi") => "video/x-msvideo",
        Some("ogg" | "ogv") => "video/ogg",
        _ => "application/octet-stream",
    }
}

/// Extract the bearer token from the `Authorization` header.
fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| ApiError::Unauthorized("missing bearer token".to_string()))
}

/// Parse `bytes=<start>-<end?>` into a clamped inclusive byte window.
///
/// `start` is clamped to `[0, file_size - 1]`; an omitted `end` defaults to
/// `file_size - 1`, a present one is clamped to it. Anything unparsable, or
/// a window that is empty after clamping, returns None and the caller falls
/// back to a full-file response.
fn parse_range(header: &str, file_size: u64) -> Option<(u64, u64)> {
    if file_size == 0 {
        return None;
    }

    let window = header.strip_prefix("bytes=")?;
    let (start_str, end_str) = window.split_once('-')?;

    let start: u64 = start_str.trim().parse().ok()?;
    let start = start.min(file_size - 1);

    let end = if end_str.trim().is_empty() {
        file_size - 1
    } else {
        let end: u64 = end_str.trim().parse().ok()?;
        end.min(file_size - 1)
    };

    if end < start {
        return None;
    }

    Some((start, end))
}
