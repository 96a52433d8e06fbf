//! UseCase: accept a message and persist it as `sent`.

use std::sync::Arc;

use crate::domain::{ChatId, Message, MessageStore, NewMessage, UserId};

use super::error::SendMessageError;

/// Validates an inbound message and persists it through the Message Store
/// with the initial `sent` status. Fan-out to recipients is a separate
/// concern handled by [`super::ChatBroadcaster`]; the synchronous HTTP
/// fallback path uses this use case alone.
pub struct SendMessageUseCase {
    store: Arc<dyn MessageStore>,
}

impl SendMessageUseCase {
    pub fn new(store: Arc<dyn MessageStore>) -> Self {
        Self { store }
    }

    /// Persist a message and return the full record.
    ///
    /// # Errors
    ///
    /// * [`SendMessageError::EmptyMessage`] if `content` is blank and no
    ///   attachment locator is present.
    /// * [`SendMessageError::ChatNotFound`] if `chat_id` does not resolve.
    /// * [`SendMessageError::Store`] on persistence failure.
    pub async fn execute(
        &self,
        chat_id: ChatId,
        sender_id: UserId,
        content: String,
        file_url: Option<String>,
    ) -> Result<Message, SendMessageError> {
        if content.trim().is_empty() && file_url.is_none() {
            return Err(SendMessageError::EmptyMessage);
        }

        if self.store.get_chat(chat_id).await?.is_none() {
            return Err(SendMessageError::ChatNotFound(chat_id));
        }

        let message = self
            .store
            .create_message(NewMessage {
                chat_id,
                sender_id,
                content,
                file_url,
            })
            .await?;

        tracing::debug!(
            "persisted message {} from user {} in chat {}",
            message.id,
            sender_id,
            chat_id
        );
        Ok(message)
    }
}
