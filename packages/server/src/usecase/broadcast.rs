//! Fan-out broadcaster: push one event to every connection of a chat's
//! members.

use std::sync::Arc;

use crate::domain::{ChatId, MessageStore, UserId};
use crate::infrastructure::dto::websocket::ServerFrame;
use crate::infrastructure::registry::ConnectionRegistry;

/// Resolves chat membership through the Message Store and delivers a frame
/// to every registry-known connection of every member, except the excluded
/// user's own connections.
///
/// Best-effort by contract: a missing chat, a store failure or a dead
/// connection is logged and skipped; nothing surfaces to the caller and no
/// delivery is retried. Dead connections are cleaned up by their own
/// session's close handling, not here.
pub struct ChatBroadcaster {
    registry: Arc<ConnectionRegistry>,
    store: Arc<dyn MessageStore>,
}

impl ChatBroadcaster {
    pub fn new(registry: Arc<ConnectionRegistry>, store: Arc<dyn MessageStore>) -> Self {
        Self { registry, store }
    }

    /// Deliver `frame` to the chat's connected members.
    ///
    /// Membership and registry state are snapshots taken at call time;
    /// connections registering mid-broadcast do not receive this event.
    pub async fn broadcast(
        &self,
        chat_id: ChatId,
        frame: &ServerFrame,
        exclude_user: Option<UserId>,
    ) {
        match self.store.get_chat(chat_id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                tracing::warn!("broadcast dropped: chat {} not found", chat_id);
                return;
            }
            Err(e) => {
                tracing::warn!("broadcast dropped: failed to resolve chat {}: {}", chat_id, e);
                return;
            }
        }

        let members = match self.store.get_chat_members(chat_id).await {
            Ok(members) => members,
            Err(e) => {
                tracing::warn!(
                    "broadcast dropped: failed to resolve members of chat {}: {}",
                    chat_id,
                    e
                );
                return;
            }
        };

        // Serialize once, clone the string per recipient.
        let payload = match serde_json::to_string(frame) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!("failed to serialize outbound frame: {}", e);
                return;
            }
        };

        for member in members {
            if exclude_user == Some(member) {
                continue;
            }
            for sender in self.registry.connections_for(member).await {
                // Fire-and-forget: a closed channel means the session is
                // already tearing down.
                if sender.send(payload.clone()).is_err() {
                    tracing::warn!(
                        "failed to push frame to a connection of user {} in chat {}",
                        member,
                        chat_id
                    );
                }
            }
        }
    }
}
