//! Message Store implementations.

mod memory;

pub use memory::InMemoryMessageStore;
