//! Cache store adapters implementing `cacheable_core::CacheStore`.

pub mod memory;

pub use memory::{MemoryStore, MemoryStoreConfig, DEFAULT_MAX_CAPACITY};
