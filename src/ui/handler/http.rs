//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};

use crate::domain::RoomId;
use crate::infrastructure::dto::http::{VerifyPinRequest, VerifyPinResponse};
use crate::ui::{error::ApiError, state::AppState};
use crate::usecase::VerifyPinError;

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Verify a room's PIN before the client opens the real-time connection.
///
/// 404 for unknown rooms, 403 for a PIN mismatch regardless of the room's
/// video source type.
pub async fn verify_pin(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    Json(request): Json<VerifyPinRequest>,
) -> Result<Json<VerifyPinResponse>, ApiError> {
    let room_id =
        RoomId::new(room_id).map_err(|e| ApiError::NotFound(format!("invalid room id: {e}")))?;

    let access = state
        .verify_pin_usecase
        .execute(&room_id, &request.pin)
        .await
        .map_err(|e| match e {
            VerifyPinError::RoomNotFound => ApiError::NotFound("room not found".to_string()),
            VerifyPinError::PinMismatch => {
                tracing::warn!("PIN mismatch for room '{}'", room_id);
                ApiError::Forbidden("PIN mismatch".to_string())
            }
            VerifyPinError::Store(e) => ApiError::Internal(e.to_string()),
        })?;

    Ok(Json(VerifyPinResponse {
        video_url: access.video_url,
        is_local_file: access.is_local_file,
    }))
}
