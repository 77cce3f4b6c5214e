//! # Cacheable Core
//!
//! Cache-aside invocation coalescing - no storage of its own.
//!
//! This crate contains:
//! - Key composition from explicit key material or a method's arguments
//! - The coalescing executor that shares in-flight reads and computations
//! - The cache store port (trait) every backend implements
//!
//! ## Architecture Principles
//! - Only depends on `cacheable-common`
//! - No store implementation; backends plug in through [`CacheStore`]
//! - Explicitly constructed [`Coalescer`]; the [`registry`] is an opt-in
//!   process-wide slot on top of it

pub mod coalesce;
pub mod keys;
pub mod registry;
#[cfg(any(feature = "test-utils", test))]
pub mod testing;

// Store port
pub mod store_ports;

pub use coalesce::{CacheLookup, Coalescer, CoalescerConfig, CoalescerConfigBuilder, CoalescerStats};
pub use keys::{compose_keys, KeyComposer, KeyGenerator, KeySet, KeySpec};
pub use store_ports::{CacheStore, SetOptions, TtlConvention, TtlSpec};
