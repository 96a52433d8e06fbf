//! Use cases of the realtime core: message lifecycle operations and the
//! fan-out broadcaster.

mod broadcast;
mod error;
mod mark_read;
mod send_message;

pub use broadcast::ChatBroadcaster;
pub use error::SendMessageError;
pub use mark_read::MarkReadUseCase;
pub use send_message::SendMessageUseCase;
