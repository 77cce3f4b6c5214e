//! Coalesced cache-aside resolution.
//!
//! [`Coalescer::resolve`] reads through the store and falls back to a
//! computation, sharing one in-flight store read and one in-flight
//! computation among all concurrent callers for the same key.
//!
//! ```text
//! resolve(key) ──► pending reads ──► store.get ── Found ──► value
//!                                      │
//!                                   Missing / Err
//!                                      ▼
//!                  pending computations ──► compute ──► store.set ──► value
//! ```

mod config;
mod executor;
mod lookup;
mod pending;
mod stats;

pub use config::{CoalescerConfig, CoalescerConfigBuilder};
pub use executor::Coalescer;
pub use lookup::CacheLookup;
pub use stats::CoalescerStats;
