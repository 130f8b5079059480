//! In-memory adapters for development and testing.

mod in_memory_user_store;

pub use in_memory_user_store::InMemoryUserStore;
