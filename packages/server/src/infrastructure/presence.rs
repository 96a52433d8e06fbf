//! Ephemeral typing presence, keyed by chat.
//!
//! Nothing here is persisted: the tracker holds only "who is typing right
//! now" and is rebuilt from zero on process restart. The server does not
//! time out stale entries itself; the triggering client sends
//! `isTyping: false` after its inactivity window.

use std::collections::HashMap;

use tokio::sync::Mutex;

use crate::domain::ChatId;

/// Per-chat sets of usernames currently typing.
#[derive(Default)]
pub struct PresenceTracker {
    /// chat -> usernames in insertion order.
    typing: Mutex<HashMap<ChatId, Vec<String>>>,
}

impl PresenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or remove a username from a chat's typing set. Pure set
    /// semantics: no duplicates, removing an absent name is a no-op.
    pub async fn set_typing(&self, chat_id: ChatId, username: &str, is_typing: bool) {
        let mut typing = self.typing.lock().await;
        if is_typing {
            let users = typing.entry(chat_id).or_default();
            if !users.iter().any(|u| u == username) {
                users.push(username.to_string());
            }
        } else if let Some(users) = typing.get_mut(&chat_id) {
            users.retain(|u| u != username);
            if users.is_empty() {
                typing.remove(&chat_id);
            }
        }
    }

    /// Usernames typing in a chat, ordered by when they started.
    pub async fn typing_users(&self, chat_id: ChatId) -> Vec<String> {
        let typing = self.typing.lock().await;
        typing.get(&chat_id).cloned().unwrap_or_default()
    }

    /// Drop a username from every chat's typing set.
    ///
    /// Extension point for disconnect cleanup; the session handler does not
    /// call this yet, mirroring the observed behavior where a vanished
    /// client's entry is cleared by its own `isTyping: false` or not at all.
    pub async fn clear_user(&self, username: &str) {
        let mut typing = self.typing.lock().await;
        for users in typing.values_mut() {
            users.retain(|u| u != username);
        }
        typing.retain(|_, users| !users.is_empty());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn typing_users_are_tracked_per_chat() {
        let tracker = PresenceTracker::new();
        tracker.set_typing(ChatId(7), "alice", true).await;
        tracker.set_typing(ChatId(8), "bob", true).await;

        assert_eq!(tracker.typing_users(ChatId(7)).await, vec!["alice"]);
        assert_eq!(tracker.typing_users(ChatId(8)).await, vec!["bob"]);
    }

    #[tokio::test]
    async fn duplicate_start_events_do_not_duplicate_the_entry() {
        let tracker = PresenceTracker::new();
        tracker.set_typing(ChatId(7), "alice", true).await;
        tracker.set_typing(ChatId(7), "alice", true).await;

        assert_eq!(tracker.typing_users(ChatId(7)).await, vec!["alice"]);
    }

    #[tokio::test]
    async fn stop_removes_the_entry_and_absent_stop_is_a_noop() {
        let tracker = PresenceTracker::new();
        tracker.set_typing(ChatId(7), "alice", true).await;

        tracker.set_typing(ChatId(7), "alice", false).await;
        assert!(tracker.typing_users(ChatId(7)).await.is_empty());

        // Stopping again (or for a name never seen) must not error.
        tracker.set_typing(ChatId(7), "alice", false).await;
        tracker.set_typing(ChatId(7), "nobody", false).await;
        assert!(tracker.typing_users(ChatId(7)).await.is_empty());
    }

    #[tokio::test]
    async fn order_follows_insertion() {
        let tracker = PresenceTracker::new();
        tracker.set_typing(ChatId(7), "charlie", true).await;
        tracker.set_typing(ChatId(7), "alice", true).await;
        tracker.set_typing(ChatId(7), "bob", true).await;

        assert_eq!(
            tracker.typing_users(ChatId(7)).await,
            vec!["charlie", "alice", "bob"]
        );
    }

    #[tokio::test]
    async fn clear_user_removes_the_name_from_every_chat() {
        let tracker = PresenceTracker::new();
        tracker.set_typing(ChatId(7), "alice", true).await;
        tracker.set_typing(ChatId(8), "alice", true).await;
        tracker.set_typing(ChatId(8), "bob", true).await;

        tracker.clear_user("alice").await;

        assert!(tracker.typing_users(ChatId(7)).await.is_empty());
        assert_eq!(tracker.typing_users(ChatId(8)).await, vec!["bob"]);
    }
}
