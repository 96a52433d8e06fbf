//! In-memory Message Store implementation.
//!
//! Mutex-guarded maps standing in for a relational database, so the server
//! binary and the tests run without external infrastructure. Message ids are
//! a monotonic counter and creation order doubles as display order, the same
//! contract a SQL-backed store would satisfy with a serial primary key and
//! `ORDER BY created_at`.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::domain::{
    Chat, ChatId, ChatKind, DeliveryStatus, Message, MessageId, MessageStore, NewMessage,
    StoreError, UserId,
};

struct StoreInner {
    chats: HashMap<ChatId, Chat>,
    members: HashMap<ChatId, Vec<UserId>>,
    /// Creation order preserved; all reads filter by chat.
    messages: Vec<Message>,
    next_message_id: i64,
}

impl Default for StoreInner {
    fn default() -> Self {
        Self {
            chats: HashMap::new(),
            members: HashMap::new(),
            messages: Vec::new(),
            next_message_id: 1,
        }
    }
}

/// Message Store backed by process memory.
#[derive(Default)]
pub struct InMemoryMessageStore {
    inner: Mutex<StoreInner>,
}

impl InMemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a chat and its member list.
    pub async fn add_chat(&self, chat: Chat, members: Vec<UserId>) {
        let mut inner = self.inner.lock().await;
        inner.members.insert(chat.id, members);
        inner.chats.insert(chat.id, chat);
    }

    /// A store pre-populated with the demo conversations the server binary
    /// serves out of the box.
    pub fn with_demo_data() -> Self {
        let mut store = Self::new();
        {
            let inner = store.inner.get_mut();
            let general = Chat {
                id: ChatId(1),
                name: "general".to_string(),
                kind: ChatKind::Group,
            };
            inner
                .members
                .insert(general.id, vec![UserId(1), UserId(2), UserId(3)]);
            inner.chats.insert(general.id, general);

            let direct = Chat {
                id: ChatId(2),
                name: "sarah & michael".to_string(),
                kind: ChatKind::Direct,
            };
            inner.members.insert(direct.id, vec![UserId(1), UserId(2)]);
            inner.chats.insert(direct.id, direct);
        }
        store
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn create_message(&self, message: NewMessage) -> Result<Message, StoreError> {
        let mut inner = self.inner.lock().await;
        if !inner.chats.contains_key(&message.chat_id) {
            return Err(StoreError::ChatNotFound(message.chat_id));
        }

        let id = MessageId(inner.next_message_id);
        inner.next_message_id += 1;

        let record = Message {
            id,
            chat_id: message.chat_id,
            sender_id: message.sender_id,
            content: message.content,
            file_url: message.file_url,
            status: DeliveryStatus::Sent,
            created_at: Utc::now(),
        };
        inner.messages.push(record.clone());
        Ok(record)
    }

    async fn get_messages_by_chat(&self, chat_id: ChatId) -> Result<Vec<Message>, StoreError> {
        let inner = self.inner.lock().await;
        if !inner.chats.contains_key(&chat_id) {
            return Err(StoreError::ChatNotFound(chat_id));
        }
        Ok(inner
            .messages
            .iter()
            .filter(|m| m.chat_id == chat_id)
            .cloned()
            .collect())
    }

    async fn update_message_status(
        &self,
        message_id: MessageId,
        status: DeliveryStatus,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        let message = inner
            .messages
            .iter_mut()
            .find(|m| m.id == message_id)
            .ok_or(StoreError::MessageNotFound(message_id))?;

        if !message.status.can_advance_to(status) {
            return Err(StoreError::InvalidStatusTransition {
                id: message_id,
                from: message.status,
                to: status,
            });
        }
        message.status = status;
        Ok(())
    }

    async fn get_chat(&self, chat_id: ChatId) -> Result<Option<Chat>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.chats.get(&chat_id).cloned())
    }

    async fn get_chat_members(&self, chat_id: ChatId) -> Result<Vec<UserId>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.members.get(&chat_id).cloned().unwrap_or_default())
    }
}
