//! Domain model and the interfaces the core expects its collaborators to
//! provide.

mod model;
mod store;

pub use model::{Chat, ChatId, ChatKind, DeliveryStatus, Message, MessageId, UserId};
#[cfg(test)]
pub use store::MockMessageStore;
pub use store::{MessageStore, NewMessage, StoreError};
