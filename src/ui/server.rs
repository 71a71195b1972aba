//! Server execution logic.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use super::{
    handler::{health_check, stream_video, verify_pin, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Build the application router.
///
/// Shared between [`Server::run`] and the integration tests, which mount it
/// on an ephemeral port.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        // real-time gateway
        .route("/ws", get(websocket_handler))
        // media streaming (stateless, independent of the socket layer)
        .route("/stream/{room_id}", get(stream_video))
        // room access
        .route("/rooms/{room_id}/verify-pin", post(verify_pin))
        .route("/api/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Watch-party server.
///
/// Wraps the shared application state and runs the axum router with
/// graceful shutdown.
pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    /// Create a new Server instance around the assembled application state.
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Run the server.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address
    /// or if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app = app(self.state);

        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        tracing::info!("Watch-party server listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
