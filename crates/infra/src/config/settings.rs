//! Process configuration for the coalescer and its store.

use cacheable_core::CoalescerConfig;
use serde::{Deserialize, Serialize};

use crate::stores::MemoryStoreConfig;

/// Everything needed to build a [`Coalescer`](cacheable_core::Coalescer)
/// backed by a [`MemoryStore`](crate::stores::MemoryStore).
///
/// Both sections are optional in config files; missing fields take their
/// defaults.
///
/// ```toml
/// [coalescer]
/// ttl_convention = "bare"
/// default_ttl = 30000
///
/// [store]
/// max_capacity = 5000
/// default_ttl = 60000
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Write-call convention and default ttl
    pub coalescer: CoalescerConfig,

    /// In-memory store sizing
    pub store: MemoryStoreConfig,
}
