//! In-memory cache store with per-entry TTL.
//!
//! Backs [`CacheStore`] with a moka future cache. Every entry carries the
//! ttl it was written with, from either write-call convention; entries
//! written without one fall back to the store's default ttl, or never expire
//! if there is none.
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//!
//! use cacheable_infra::stores::{MemoryStore, MemoryStoreConfig};
//!
//! let store = MemoryStore::new(MemoryStoreConfig {
//!     max_capacity: 1_000,
//!     default_ttl: Some(Duration::from_secs(300)),
//! });
//! ```

use std::time::{Duration, Instant};

use async_trait::async_trait;
use cacheable_common::{option_duration_millis, CacheResult};
use cacheable_core::{CacheStore, TtlSpec};
use moka::future::Cache;
use moka::Expiry;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default maximum number of entries.
pub const DEFAULT_MAX_CAPACITY: u64 = 10_000;

/// Configuration for [`MemoryStore`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryStoreConfig {
    /// Maximum number of entries before eviction
    pub max_capacity: u64,

    /// Ttl for entries written without one (None = never expire)
    #[serde(with = "option_duration_millis")]
    pub default_ttl: Option<Duration>,
}

impl Default for MemoryStoreConfig {
    fn default() -> Self {
        Self { max_capacity: DEFAULT_MAX_CAPACITY, default_ttl: None }
    }
}

#[derive(Debug, Clone)]
struct StoredEntry {
    value: Value,
    ttl: Option<Duration>,
}

struct EntryExpiry {
    default_ttl: Option<Duration>,
}

impl Expiry<String, StoredEntry> for EntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &StoredEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        entry.ttl.or(self.default_ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &StoredEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        // An overwrite restarts the clock with the new entry's ttl.
        entry.ttl.or(self.default_ttl)
    }
}

/// Thread-safe in-memory [`CacheStore`].
///
/// Clones share the same underlying cache.
#[derive(Clone)]
pub struct MemoryStore {
    cache: Cache<String, StoredEntry>,
    config: MemoryStoreConfig,
}

impl MemoryStore {
    /// Create a store with the given capacity and default ttl.
    #[must_use]
    pub fn new(config: MemoryStoreConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_capacity)
            .expire_after(EntryExpiry { default_ttl: config.default_ttl })
            .build();
        Self { cache, config }
    }

    /// Active configuration.
    pub fn config(&self) -> &MemoryStoreConfig {
        &self.config
    }

    /// Approximate number of live entries.
    ///
    /// Moka applies writes and expirations lazily; call
    /// [`run_pending_tasks`](Self::run_pending_tasks) first for an exact
    /// count.
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Apply pending maintenance (evictions, expirations, counters).
    pub async fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks().await;
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(MemoryStoreConfig::default())
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("config", &self.config)
            .field("entry_count", &self.cache.entry_count())
            .finish()
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, key: &str) -> CacheResult<Option<Value>> {
        Ok(self.cache.get(key).await.map(|entry| entry.value))
    }

    async fn set(&self, key: &str, value: Value, ttl: TtlSpec) -> CacheResult<()> {
        let ttl = ttl.ttl();
        tracing::trace!(key = %key, ttl = ?ttl, "Storing cache entry");
        self.cache.insert(key.to_owned(), StoredEntry { value, ttl }).await;
        Ok(())
    }

    async fn del(&self, key: &str) -> CacheResult<()> {
        self.cache.invalidate(key).await;
        Ok(())
    }
}
