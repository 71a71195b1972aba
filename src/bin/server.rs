//! Watch-party server binary.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin server
//! cargo run --bin server -- --host 0.0.0.0 --port 3000 --video-path /videos/movie.mp4
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use watchroom::{
    common::{
        logger::setup_logger,
        time::{self, SystemClock},
    },
    domain::{Principal, RoomId, RoomRecord, UserId, VideoSource},
    infrastructure::{
        InMemoryChatStore, InMemoryRoomStore, InMemorySessionRegistry, SignedTokenVerifier,
        WebSocketMessagePusher, token::issue_token,
    },
    ui::{Server, state::AppState},
    usecase::{
        DisconnectUseCase, JoinRoomUseCase, RelayLock, SendChatUseCase, UpdatePlaybackUseCase,
        VerifyPinUseCase,
    },
};

#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "Watch-party synchronization server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Shared secret for auth token verification
    #[arg(long, default_value = "dev-secret")]
    token_secret: String,

    /// Seed a room backed by a local video file
    #[arg(long, conflicts_with = "video_url")]
    video_path: Option<PathBuf>,

    /// Seed a room backed by a remote video URL
    #[arg(long)]
    video_url: Option<String>,

    /// Id of the seeded room
    #[arg(long, default_value = "default")]
    room_id: String,

    /// PIN of the seeded room
    #[arg(long, default_value = "0000")]
    room_pin: String,
}

#[tokio::main]
async fn main() {
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    let clock = Arc::new(SystemClock);

    // Collaborators: registry, stores, pusher, verifier
    let registry = Arc::new(InMemorySessionRegistry::new());
    let room_store = Arc::new(InMemoryRoomStore::new());
    let chat_store = Arc::new(InMemoryChatStore::new(clock.clone()));
    let message_pusher = Arc::new(WebSocketMessagePusher::new());
    let token_verifier = Arc::new(SignedTokenVerifier::new(
        args.token_secret.clone(),
        clock.clone(),
    ));

    // Seed the demo room if a source was given; in production the room
    // store sits in front of the external room CRUD service.
    let source = match (args.video_path, args.video_url) {
        (Some(path), _) => Some(VideoSource::LocalFile(path)),
        (None, Some(url)) => Some(VideoSource::Remote(url)),
        (None, None) => None,
    };
    if let Some(source) = source {
        let owner = UserId::new("host".to_string()).expect("static owner id is valid");
        let room_id = match RoomId::new(args.room_id.clone()) {
            Ok(id) => id,
            Err(e) => {
                tracing::error!("Invalid --room-id: {}", e);
                std::process::exit(1);
            }
        };
        room_store
            .insert(RoomRecord {
                id: room_id,
                name: args.room_id.clone(),
                source,
                pin: args.room_pin.clone(),
                owner: owner.clone(),
            })
            .await;
        tracing::info!(
            "Seeded room '{}' (PIN {})",
            args.room_id,
            args.room_pin
        );

        // Convenience token for manual testing, valid for 24 hours
        let dev_token = issue_token(
            &args.token_secret,
            &Principal {
                user_id: owner,
                name: "Host".to_string(),
            },
            time::now_utc_millis() + 24 * 60 * 60 * 1000,
        );
        tracing::info!("Dev auth token: {}", dev_token);
    }

    // UseCases, all relaying through one serialization lock
    let relay = Arc::new(RelayLock::new());
    let join_room_usecase = Arc::new(JoinRoomUseCase::new(
        registry.clone(),
        chat_store.clone(),
        message_pusher.clone(),
        relay.clone(),
    ));
    let update_playback_usecase = Arc::new(UpdatePlaybackUseCase::new(
        registry.clone(),
        message_pusher.clone(),
        relay.clone(),
    ));
    let send_chat_usecase = Arc::new(SendChatUseCase::new(
        token_verifier.clone(),
        chat_store,
        registry.clone(),
        message_pusher.clone(),
        relay.clone(),
    ));
    let disconnect_usecase = Arc::new(DisconnectUseCase::new(
        registry.clone(),
        message_pusher.clone(),
        relay,
    ));
    let verify_pin_usecase = Arc::new(VerifyPinUseCase::new(room_store.clone()));

    let state = Arc::new(AppState {
        join_room_usecase,
        update_playback_usecase,
        send_chat_usecase,
        disconnect_usecase,
        verify_pin_usecase,
        registry,
        room_store,
        token_verifier,
        message_pusher,
    });

    let server = Server::new(state);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
