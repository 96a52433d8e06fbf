//! Connection registry: which live connections belong to which user.
//!
//! One user may hold several connections at once (multiple tabs or devices).
//! All mutations go through a single keyed map guarded by a mutex, so
//! concurrent register/unregister calls from different connection handlers
//! are serialized; reads hand out a snapshot of the senders known at call
//! time. An entry exists only while its connection is open: the session
//! handler unregisters the exact connection the moment the transport closes
//! or errors.

use std::collections::HashMap;
use std::fmt;

use tokio::sync::{Mutex, mpsc};
use uuid::Uuid;

use crate::domain::UserId;

/// Channel used to push outbound frames to one connection's writer task.
pub type OutboundSender = mpsc::UnboundedSender<String>;

/// Opaque identifier minted per accepted socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Default)]
struct RegistryInner {
    /// user -> (connection -> outbound sender)
    by_user: HashMap<UserId, HashMap<ConnectionId, OutboundSender>>,
    /// Reverse index so `unregister` only needs the connection id.
    owners: HashMap<ConnectionId, UserId>,
}

/// Registry of live, authenticated connections.
#[derive(Default)]
pub struct ConnectionRegistry {
    inner: Mutex<RegistryInner>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a (user, connection) mapping. Idempotent for the same pair.
    pub async fn register(
        &self,
        user_id: UserId,
        connection_id: ConnectionId,
        sender: OutboundSender,
    ) {
        let mut inner = self.inner.lock().await;
        inner
            .by_user
            .entry(user_id)
            .or_default()
            .insert(connection_id, sender);
        inner.owners.insert(connection_id, user_id);
        tracing::debug!(
            "registered connection {} for user {}",
            connection_id,
            user_id
        );
    }

    /// Remove the mapping for this exact connection. No-op if absent.
    pub async fn unregister(&self, connection_id: ConnectionId) {
        let mut inner = self.inner.lock().await;
        if let Some(user_id) = inner.owners.remove(&connection_id) {
            if let Some(connections) = inner.by_user.get_mut(&user_id) {
                connections.remove(&connection_id);
                if connections.is_empty() {
                    inner.by_user.remove(&user_id);
                }
            }
            tracing::debug!(
                "unregistered connection {} of user {}",
                connection_id,
                user_id
            );
        }
    }

    /// Snapshot of the outbound senders currently registered for a user.
    /// An empty vec means "user not connected", which is a normal state.
    pub async fn connections_for(&self, user_id: UserId) -> Vec<OutboundSender> {
        let inner = self.inner.lock().await;
        inner
            .by_user
            .get(&user_id)
            .map(|connections| connections.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of live connections across all users.
    pub async fn connection_count(&self) -> usize {
        self.inner.lock().await.owners.len()
    }
}
