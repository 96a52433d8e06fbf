//! HTTP/WebSocket surface of the chat server.

pub mod handler;
mod server;
mod signal;
mod state;

pub use server::{Server, app};
pub use state::AppState;
