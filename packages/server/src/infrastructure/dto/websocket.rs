//! WebSocket wire format.
//!
//! Frames are JSON objects with a `type` discriminator and a `data` payload,
//! e.g. `{"type":"auth","data":{"userId":1}}`. Decoding happens exactly once
//! at the protocol boundary into a closed enum; unknown `type` values or
//! missing fields fail deserialization and the frame is dropped by the
//! session handler.

use serde::{Deserialize, Serialize};

use crate::domain::{ChatId, Message, UserId};

/// Frames a client may send.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum ClientFrame {
    /// Binds the connection to a user identity. The claimed id comes from a
    /// session already validated at connection-accept time; the core does
    /// not re-verify it.
    Auth(AuthPayload),
    /// Heartbeat; answered with [`ServerFrame::Pong`] immediately.
    Ping,
    Message(SendMessagePayload),
    Typing(TypingPayload),
}

/// Frames the server pushes to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum ServerFrame {
    Pong,
    /// Full persisted message record, fanned out to the chat's members.
    Message(Message),
    /// Typing indicator relayed to the chat's members.
    Typing(TypingPayload),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPayload {
    pub user_id: UserId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessagePayload {
    pub chat_id: ChatId,
    pub content: String,
    #[serde(default)]
    pub file_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingPayload {
    pub chat_id: ChatId,
    pub user_id: UserId,
    pub username: String,
    pub is_typing: bool,
}
