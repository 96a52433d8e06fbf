//! UseCase: bulk read catch-up for a chat.

use std::sync::Arc;

use crate::domain::{ChatId, DeliveryStatus, Message, MessageStore, StoreError, UserId};

/// Advances every unread message another user sent in a chat to `read`.
///
/// Triggered by "this reader fetched the chat's messages": a bulk catch-up,
/// not a per-message acknowledgment protocol. A store failure on one message
/// is logged and skipped; the rest of the batch still advances.
pub struct MarkReadUseCase {
    store: Arc<dyn MessageStore>,
}

impl MarkReadUseCase {
    pub fn new(store: Arc<dyn MessageStore>) -> Self {
        Self { store }
    }

    /// Run the catch-up and return the chat's messages with the statuses
    /// the reader now observes.
    pub async fn execute(
        &self,
        chat_id: ChatId,
        reader_id: UserId,
    ) -> Result<Vec<Message>, StoreError> {
        let mut messages = self.store.get_messages_by_chat(chat_id).await?;

        for message in &mut messages {
            if message.sender_id == reader_id || message.status == DeliveryStatus::Read {
                continue;
            }
            match self
                .store
                .update_message_status(message.id, DeliveryStatus::Read)
                .await
            {
                Ok(()) => message.status = DeliveryStatus::Read,
                Err(e) => {
                    tracing::warn!("failed to mark message {} as read: {}", message.id, e);
                }
            }
        }

        Ok(messages)
    }
}
