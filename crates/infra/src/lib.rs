//! # Cacheable Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - An in-memory cache store (moka) with per-entry TTL
//! - Configuration loading from environment variables and files
//! - Bootstrap helpers wiring both into a `Coalescer`
//!
//! ## Architecture
//! - Implements traits defined in `cacheable-core`
//! - Depends on `cacheable-common` and `cacheable-core`
//! - Contains all "impure" code (I/O, environment, clocks)

pub mod bootstrap;
pub mod config;
pub mod stores;

// Re-export commonly used items
pub use bootstrap::{build_coalescer, install_from_config};
pub use config::Settings;
pub use stores::{MemoryStore, MemoryStoreConfig};
