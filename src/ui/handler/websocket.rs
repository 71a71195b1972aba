//! WebSocket connection gateway.
//!
//! Owns the per-connection lifecycle: upgrade, event dispatch, teardown.
//! Playback and chat relaying is delegated to the usecase layer; this module
//! only translates between socket frames and domain calls.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::domain::{ConnectionId, RoomId};
use crate::infrastructure::dto::websocket::{ClientEvent, ServerEvent};
use crate::ui::state::AppState;

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    // No membership exists until an explicit join-room event; the socket is
    // merely registered for outbound delivery.
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that drains the connection's outbound channel into the
/// WebSocket sink.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let connection_id = ConnectionId::generate();
    let (sender, mut receiver) = socket.split();

    // Create this connection's outbound channel and register it for fan-out
    let (tx, rx) = mpsc::unbounded_channel();
    state
        .message_pusher
        .register_connection(connection_id, tx)
        .await;
    tracing::info!("Connection '{}' established", connection_id);

    let mut send_task = pusher_loop(rx, sender);

    let recv_state = state.clone();
    let mut recv_task = tokio::spawn(async move {
        // At most one joined room per connection
        let mut joined_room: Option<RoomId> = None;

        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on '{}': {}", connection_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    let event = match serde_json::from_str::<ClientEvent>(&text) {
                        Ok(event) => event,
                        Err(e) => {
                            tracing::warn!(
                                "Unparseable event from '{}': {} ({})",
                                connection_id,
                                e,
                                text
                            );
                            continue;
                        }
                    };
                    handle_client_event(event, connection_id, &recv_state, &mut joined_room).await;
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", connection_id);
                    break;
                }
                // Ping/pong is handled by the transport
                _ => {}
            }
        }
    });

    // Whichever task finishes first tears the other down
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    state.disconnect_usecase.execute(connection_id).await;
}

async fn handle_client_event(
    event: ClientEvent,
    connection_id: ConnectionId,
    state: &Arc<AppState>,
    joined_room: &mut Option<RoomId>,
) {
    match event {
        ClientEvent::JoinRoom { room_id } => {
            let room_id = match RoomId::new(room_id) {
                Ok(id) => id,
                Err(e) => {
                    tracing::warn!("Rejected join from '{}': {}", connection_id, e);
                    return;
                }
            };

            // A connection is in at most one room; switching leaves the old one.
            if let Some(previous) = joined_room.take()
                && previous != room_id
            {
                state.registry.leave(&previous, &connection_id).await;
            }

            let (_, history) = state
                .join_room_usecase
                .execute(room_id.clone(), connection_id, |playback_state, history| {
                    let replay = ServerEvent::RoomJoined {
                        playback_state: *playback_state,
                        history: history.iter().cloned().map(Into::into).collect(),
                    };
                    serde_json::to_string(&replay).unwrap()
                })
                .await;
            tracing::info!(
                "Connection '{}' joined room '{}', replayed {} message(s)",
                connection_id,
                room_id,
                history.len()
            );

            *joined_room = Some(room_id);
        }
        ClientEvent::PlaybackStateChange {
            room_id,
            playback_state,
        } => {
            let room_id = match RoomId::new(room_id) {
                Ok(id) => id,
                Err(e) => {
                    tracing::warn!("Rejected state change from '{}': {}", connection_id, e);
                    return;
                }
            };

            let update = ServerEvent::PlaybackStateUpdate { playback_state };
            let update_json = serde_json::to_string(&update).unwrap();
            let targets = state
                .update_playback_usecase
                .execute(&room_id, playback_state, &connection_id, &update_json)
                .await;
            tracing::debug!(
                "Playback change in '{}' from '{}' relayed to {} member(s)",
                room_id,
                connection_id,
                targets.len()
            );
        }
        ClientEvent::ChatMessage {
            room_id,
            text,
            auth_token,
        } => {
            let room_id = match RoomId::new(room_id) {
                Ok(id) => id,
                Err(e) => {
                    tracing::warn!("Rejected chat from '{}': {}", connection_id, e);
                    return;
                }
            };

            // The usecase echoes the stored record to the whole room, sender
            // included, once the append has happened.
            match state
                .send_chat_usecase
                .execute(room_id.clone(), text, &auth_token, |record| {
                    let event = ServerEvent::ChatMessage {
                        text: record.text.as_str().to_string(),
                        author_name: record.author_name.clone(),
                        server_timestamp: record.server_timestamp,
                    };
                    serde_json::to_string(&event).unwrap()
                })
                .await
            {
                Ok(record) => {
                    tracing::debug!(
                        "Chat from '{}' stored in '{}' at {}",
                        connection_id,
                        room_id,
                        record.server_timestamp
                    );
                }
                Err(e) => {
                    // Dropped silently: no error is surfaced to the sender and
                    // the connection stays open.
                    tracing::warn!(
                        "Chat from '{}' in room '{}' dropped: {}",
                        connection_id,
                        room_id,
                        e
                    );
                }
            }
        }
    }
}
