//! Message Store trait definition.
//!
//! The realtime core treats durable storage as an external collaborator: it
//! only reads chats and membership, creates messages and requests status
//! transitions. Store failures are soft: callers log them and abandon the
//! operation, never crash a connection.

use async_trait::async_trait;
use thiserror::Error;

use super::model::{Chat, ChatId, DeliveryStatus, Message, MessageId, UserId};

/// Errors surfaced by a Message Store implementation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("message {0} not found")]
    MessageNotFound(MessageId),

    #[error("chat {0} not found")]
    ChatNotFound(ChatId),

    #[error("invalid status transition for message {id}: {from} -> {to}")]
    InvalidStatusTransition {
        id: MessageId,
        from: DeliveryStatus,
        to: DeliveryStatus,
    },

    /// Backend-level failure (connectivity, I/O, ...).
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Payload for creating a message. The store assigns id, creation time and
/// the initial `sent` status.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMessage {
    pub chat_id: ChatId,
    pub sender_id: UserId,
    pub content: String,
    pub file_url: Option<String>,
}

/// Interface to durable chat state.
///
/// All operations are asynchronous and may suspend the calling connection
/// handler; they must never block handlers of other connections.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Persist a new message with status `sent` and return the full record.
    async fn create_message(&self, message: NewMessage) -> Result<Message, StoreError>;

    /// All messages of a chat in creation order.
    async fn get_messages_by_chat(&self, chat_id: ChatId) -> Result<Vec<Message>, StoreError>;

    /// Request a delivery-status transition for one message. Implementations
    /// reject non-forward transitions.
    async fn update_message_status(
        &self,
        message_id: MessageId,
        status: DeliveryStatus,
    ) -> Result<(), StoreError>;

    /// Look up a chat; `None` is the normal answer for an unknown id.
    async fn get_chat(&self, chat_id: ChatId) -> Result<Option<Chat>, StoreError>;

    /// User ids of the chat's members.
    async fn get_chat_members(&self, chat_id: ChatId) -> Result<Vec<UserId>, StoreError>;
}
