//! WebSocket client session.
//!
//! One session per connection: authenticate, then multiplex the heartbeat
//! timer, user input and incoming frames in a single select loop. The
//! session reports how it ended so the runner can decide whether to
//! reconnect.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message as WsMessage};

use palaver_server::domain::{ChatId, UserId};
use palaver_server::infrastructure::dto::websocket::{
    AuthPayload, ClientFrame, SendMessagePayload, ServerFrame, TypingPayload,
};

use crate::error::ClientError;
use crate::formatter::MessageFormatter;
use crate::input::redisplay_prompt;

/// Application-level heartbeat period
const PING_INTERVAL: Duration = Duration::from_secs(30);

/// How long after the last typing activity the client announces it stopped
const TYPING_INACTIVITY: Duration = Duration::from_secs(2);

/// Identity and target chat of this client
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub url: String,
    pub user_id: UserId,
    pub username: String,
    pub chat_id: ChatId,
}

/// How a session ended, from the runner's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The connection dropped; the runner should reconnect
    Disconnected,
    /// The user quit; the runner should exit
    Quit,
}

/// Run one connection's worth of the client session.
///
/// # Errors
///
/// Returns [`ClientError::Connect`] when the handshake fails and
/// [`ClientError::ConnectionLost`] when an established connection breaks
/// mid-session. Both are retryable.
pub async fn run_client_session(
    config: &SessionConfig,
    input_rx: &mut mpsc::UnboundedReceiver<String>,
) -> Result<SessionEnd, ClientError> {
    let (ws_stream, _response) =
        connect_async(&config.url)
            .await
            .map_err(|e| ClientError::Connect {
                url: config.url.clone(),
                reason: e.to_string(),
            })?;

    let (mut write, mut read) = ws_stream.split();

    // Bind the connection to this user before anything else.
    send_frame(
        &mut write,
        &ClientFrame::Auth(AuthPayload {
            user_id: config.user_id,
        }),
    )
    .await?;

    tracing::info!("connected to {} as user {}", config.url, config.user_id);
    println!(
        "\nConnected to chat {} as '{}'. Type messages and press Enter to send.\n\
         Commands: /typing on, /typing off, /quit\n",
        config.chat_id, config.username
    );

    let mut ping = tokio::time::interval(PING_INTERVAL);
    // The first tick fires immediately; the connection is fresh, skip it.
    ping.tick().await;

    let mut typing = TypingTracker::new();
    let mut typing_stop = Box::pin(tokio::time::sleep(TYPING_INACTIVITY));

    loop {
        tokio::select! {
            _ = ping.tick() => {
                send_frame(&mut write, &ClientFrame::Ping).await?;
            }

            // Inactivity window elapsed without further typing activity.
            _ = &mut typing_stop, if typing.is_active() => {
                if let Some(stop) = typing.expire(config) {
                    send_frame(&mut write, &stop).await?;
                }
            }

            line = input_rx.recv() => {
                let Some(line) = line else {
                    // Input thread gone (Ctrl+C / Ctrl+D).
                    return Ok(SessionEnd::Quit);
                };
                if line == "/quit" {
                    return Ok(SessionEnd::Quit);
                }
                if let Some(frame) = build_frame(&line, config) {
                    send_frame(&mut write, &frame).await?;
                    if let Some(stop) = typing.on_outbound(&frame, config) {
                        send_frame(&mut write, &stop).await?;
                    }
                    if typing.is_active() {
                        typing_stop
                            .as_mut()
                            .reset(tokio::time::Instant::now() + TYPING_INACTIVITY);
                    }
                }
            }

            incoming = read.next() => {
                match incoming {
                    Some(Ok(WsMessage::Text(text))) => {
                        handle_incoming(&text, config);
                    }
                    Some(Ok(WsMessage::Close(_))) | None => {
                        tracing::info!("server closed the connection");
                        return Ok(SessionEnd::Disconnected);
                    }
                    Some(Err(e)) => {
                        return Err(ClientError::ConnectionLost(e.to_string()));
                    }
                    _ => {}
                }
            }
        }
    }
}

/// Client-side typing state.
///
/// The server never times out typing entries on its own; the client that
/// announced typing is responsible for clearing it. This tracker decides
/// when a `isTyping: false` frame is owed: after the inactivity window
/// elapses, or as a follow-up when a message is sent while still marked as
/// typing (sending counts as "stopped typing").
struct TypingTracker {
    active: bool,
}

impl TypingTracker {
    fn new() -> Self {
        Self { active: false }
    }

    fn is_active(&self) -> bool {
        self.active
    }

    /// Observe a frame about to leave the client. Returns the stop frame to
    /// send right after it, if the frame ends the typing state.
    fn on_outbound(&mut self, frame: &ClientFrame, config: &SessionConfig) -> Option<ClientFrame> {
        match frame {
            ClientFrame::Typing(payload) => {
                self.active = payload.is_typing;
                None
            }
            ClientFrame::Message(_) if self.active => {
                self.active = false;
                Some(stop_typing_frame(config))
            }
            _ => None,
        }
    }

    /// The inactivity window elapsed; returns the stop frame to send.
    fn expire(&mut self, config: &SessionConfig) -> Option<ClientFrame> {
        if self.active {
            self.active = false;
            Some(stop_typing_frame(config))
        } else {
            None
        }
    }
}

fn stop_typing_frame(config: &SessionConfig) -> ClientFrame {
    ClientFrame::Typing(TypingPayload {
        chat_id: config.chat_id,
        user_id: config.user_id,
        username: config.username.clone(),
        is_typing: false,
    })
}

/// Turn one input line into a protocol frame, or `None` if the line is an
/// unknown command.
fn build_frame(line: &str, config: &SessionConfig) -> Option<ClientFrame> {
    match line {
        "/typing on" | "/typing off" => Some(ClientFrame::Typing(TypingPayload {
            chat_id: config.chat_id,
            user_id: config.user_id,
            username: config.username.clone(),
            is_typing: line == "/typing on",
        })),
        cmd if cmd.starts_with('/') => {
            tracing::warn!("unknown command: {}", cmd);
            None
        }
        text => Some(ClientFrame::Message(SendMessagePayload {
            chat_id: config.chat_id,
            content: text.to_string(),
            file_url: None,
        })),
    }
}

async fn send_frame<S>(write: &mut S, frame: &ClientFrame) -> Result<(), ClientError>
where
    S: SinkExt<WsMessage> + Unpin,
    S::Error: std::fmt::Display,
{
    let json = serde_json::to_string(frame)
        .map_err(|e| ClientError::ConnectionLost(format!("failed to serialize frame: {}", e)))?;
    write
        .send(WsMessage::Text(json.into()))
        .await
        .map_err(|e| ClientError::ConnectionLost(e.to_string()))
}

fn handle_incoming(text: &str, config: &SessionConfig) {
    match serde_json::from_str::<ServerFrame>(text) {
        Ok(ServerFrame::Pong) => {
            tracing::debug!("pong received");
        }
        Ok(ServerFrame::Message(message)) => {
            print!("{}", MessageFormatter::format_message(&message));
            redisplay_prompt(&config.username);
        }
        Ok(ServerFrame::Typing(payload)) => {
            print!(
                "{}",
                MessageFormatter::format_typing(&payload.username, payload.is_typing)
            );
            redisplay_prompt(&config.username);
        }
        Err(_) => {
            print!("{}", MessageFormatter::format_raw_message(text));
            redisplay_prompt(&config.username);
        }
    }
}
