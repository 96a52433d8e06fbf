//! Realtime chat server over WebSocket.
//!
//! Accepts client connections, authenticates them with an `auth` frame and
//! fans messages and typing events out to the other members of the target
//! chat. Durable state is held in the bundled in-memory store, pre-seeded
//! with demo chats.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin server
//! cargo run --bin server -- --host 0.0.0.0 --port 3000
//! ```

use std::sync::Arc;

use clap::Parser;

use palaver_server::{
    domain::MessageStore,
    infrastructure::{ConnectionRegistry, InMemoryMessageStore, PresenceTracker},
    ui::{AppState, Server},
    usecase::{ChatBroadcaster, MarkReadUseCase, SendMessageUseCase},
};
use palaver_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "Realtime chat server with message fan-out over WebSocket", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // 1. Message Store (in-memory, seeded with demo chats)
    let store: Arc<dyn MessageStore> = Arc::new(InMemoryMessageStore::with_demo_data());
    tracing::info!("in-memory store seeded with demo chats (ids 1 and 2)");

    // 2. In-process registries
    let registry = Arc::new(ConnectionRegistry::new());
    let presence = Arc::new(PresenceTracker::new());

    // 3. Use cases
    let broadcaster = Arc::new(ChatBroadcaster::new(registry.clone(), store.clone()));
    let send_message_usecase = Arc::new(SendMessageUseCase::new(store.clone()));
    let mark_read_usecase = Arc::new(MarkReadUseCase::new(store.clone()));

    // 4. Application state and server
    let state = Arc::new(AppState {
        registry,
        presence,
        send_message_usecase,
        mark_read_usecase,
        broadcaster,
    });

    let server = Server::new(state);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
