//! CLI chat client with heartbeats and automatic reconnection.
//!
//! Connects to the chat server, authenticates with an `auth` frame, then
//! sends typed messages into the chosen chat and renders incoming messages
//! and typing indicators. Reconnects every 3 seconds after a dropped
//! connection until the user quits with `/quit`, Ctrl+C or Ctrl+D.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin client -- --user-id 1 --username alice --chat-id 1
//! cargo run --bin client -- -i 2 -n sarah -c 2 -u ws://127.0.0.1:8080/ws
//! ```

use clap::Parser;

use palaver_client::{SessionConfig, run_client};
use palaver_server::domain::{ChatId, UserId};
use palaver_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "client")]
#[command(about = "CLI chat client with typing indicators and auto-reconnect", long_about = None)]
struct Args {
    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8080/ws")]
    url: String,

    /// User id to authenticate as
    #[arg(short = 'i', long)]
    user_id: i64,

    /// Display name shown in typing indicators
    #[arg(short = 'n', long)]
    username: String,

    /// Chat to send messages into
    #[arg(short = 'c', long)]
    chat_id: i64,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    let config = SessionConfig {
        url: args.url,
        user_id: UserId(args.user_id),
        username: args.username,
        chat_id: ChatId(args.chat_id),
    };

    if let Err(e) = run_client(config).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
