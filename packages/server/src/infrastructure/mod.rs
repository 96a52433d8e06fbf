//! In-process infrastructure: connection registry, typing presence, the
//! in-memory Message Store and the wire-format DTOs.

pub mod dto;
pub mod presence;
pub mod registry;
pub mod store;

pub use presence::PresenceTracker;
pub use registry::{ConnectionId, ConnectionRegistry, OutboundSender};
pub use store::InMemoryMessageStore;
