//! Client execution logic with reconnection support.

use std::time::Duration;

use crate::input::spawn_input_thread;
use crate::session::{SessionConfig, SessionEnd, run_client_session};

const RECONNECT_INTERVAL_SECS: u64 = 3;

/// Run the client, reconnecting after every dropped connection until the
/// user quits. The input thread is spawned once and shared across
/// reconnects so typed-but-unsent lines are not lost.
pub async fn run_client(config: SessionConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut input_rx = spawn_input_thread(&config.username);

    loop {
        tracing::info!("connecting to {} as user {}", config.url, config.user_id);

        match run_client_session(&config, &mut input_rx).await {
            Ok(SessionEnd::Quit) => {
                tracing::info!("client session ended normally");
                return Ok(());
            }
            Ok(SessionEnd::Disconnected) => {
                tracing::warn!("disconnected from server");
            }
            Err(e) => {
                tracing::warn!("{}", e);
            }
        }

        tracing::info!("reconnecting in {} seconds...", RECONNECT_INTERVAL_SECS);
        tokio::time::sleep(Duration::from_secs(RECONNECT_INTERVAL_SECS)).await;
    }
}
