//! CLI chat client.
//!
//! Talks the same JSON frame protocol as the server: an `auth` frame right
//! after connecting, `ping` heartbeats every 30 seconds, `message` and
//! `typing` frames from user input, and incoming `message`/`typing` frames
//! rendered to the terminal.

pub mod error;
pub mod formatter;
pub mod input;
pub mod runner;
pub mod session;

pub use runner::run_client;
pub use session::SessionConfig;
