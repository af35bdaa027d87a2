//! Store implementations that need no external backend.

mod in_memory_store;

pub use in_memory_store::InMemoryIndexStore;
