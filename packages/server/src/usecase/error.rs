//! Use-case error types.

use thiserror::Error;

use crate::domain::{ChatId, StoreError};

/// Why a message could not be accepted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SendMessageError {
    /// Content is empty (or whitespace) and no attachment was provided.
    #[error("message content is empty and no attachment was provided")]
    EmptyMessage,

    #[error("chat {0} not found")]
    ChatNotFound(ChatId),

    #[error(transparent)]
    Store(#[from] StoreError),
}
