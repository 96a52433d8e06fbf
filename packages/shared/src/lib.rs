//! Shared utilities for the palaver chat binaries.

pub mod logger;
