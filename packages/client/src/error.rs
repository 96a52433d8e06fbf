//! Error types for the chat client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The initial WebSocket handshake failed
    #[error("failed to connect to {url}: {reason}")]
    Connect { url: String, reason: String },

    /// An established connection dropped
    #[error("connection lost: {0}")]
    ConnectionLost(String),
}
