//! Shared application state handed to every handler.

use std::sync::Arc;

use crate::infrastructure::{ConnectionRegistry, PresenceTracker};
use crate::usecase::{ChatBroadcaster, MarkReadUseCase, SendMessageUseCase};

/// Everything a connection handler needs: the in-process registries and the
/// use cases over the Message Store.
pub struct AppState {
    pub registry: Arc<ConnectionRegistry>,
    pub presence: Arc<PresenceTracker>,
    pub send_message_usecase: Arc<SendMessageUseCase>,
    pub mark_read_usecase: Arc<MarkReadUseCase>,
    pub broadcaster: Arc<ChatBroadcaster>,
}
