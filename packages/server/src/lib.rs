//! Realtime delivery core for the palaver chat application.
//!
//! Keeps a registry of live WebSocket connections, fans messages and typing
//! events out to chat members, and advances each message through its
//! delivery-status lifecycle. Durable state lives behind the
//! [`domain::MessageStore`] seam; everything else in this crate holds
//! runtime-only state and starts empty on restart.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
