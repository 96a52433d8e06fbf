//! Data Transfer Objects, organized by protocol.

pub mod websocket;
