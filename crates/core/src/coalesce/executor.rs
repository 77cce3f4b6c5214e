//! The coalescing executor.

use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use cacheable_common::{CacheError, CacheResult};
use futures::FutureExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::config::CoalescerConfig;
use super::lookup::CacheLookup;
use super::pending::PendingTable;
use super::stats::{CoalescerStats, MetricsCollector};
use crate::store_ports::CacheStore;

/// Cache-aside resolver that deduplicates concurrent work per key.
///
/// For one final cache key there is at most one store read and at most one
/// computation in flight; every concurrent caller awaits the same operation.
/// Cloning is cheap and clones share the store, the pending tables and the
/// statistics.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// use cacheable_core::{CacheStore, Coalescer, CoalescerConfig};
///
/// # async fn demo(store: Arc<dyn CacheStore>) -> cacheable_common::CacheResult<()> {
/// let coalescer = Coalescer::new(store, CoalescerConfig::bare());
///
/// let name: String = coalescer
///     .resolve("users@42", || async { Ok::<_, std::io::Error>("Ada".to_string()) }, Some(Duration::from_secs(30)))
///     .await?;
/// assert_eq!(name, "Ada");
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Coalescer {
    store: Arc<dyn CacheStore>,
    config: CoalescerConfig,
    reads: PendingTable<CacheLookup>,
    computations: PendingTable<CacheResult<Value>>,
    metrics: MetricsCollector,
}

impl fmt::Debug for Coalescer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coalescer")
            .field("config", &self.config)
            .field("pending_reads", &self.reads.len())
            .field("pending_computations", &self.computations.len())
            .finish_non_exhaustive()
    }
}

impl Coalescer {
    /// Create a coalescer driving `store`.
    pub fn new(store: Arc<dyn CacheStore>, config: CoalescerConfig) -> Self {
        Self {
            store,
            config,
            reads: PendingTable::default(),
            computations: PendingTable::default(),
            metrics: MetricsCollector::default(),
        }
    }

    /// Resolve `key` from the store, or compute, write back and return it.
    ///
    /// - A cached value, `null` included, is returned without calling
    ///   `compute`.
    /// - A failed store read counts as a miss.
    /// - On a miss, `compute` runs at most once across all concurrent callers
    ///   for `key`. Its result is written under `key` with `ttl` (or the
    ///   configured default) before any caller sees it.
    /// - `compute` is dropped unused when the caller joins another caller's
    ///   computation; that computation's ttl applies.
    /// - Dropping every caller awaiting a read or computation abandons it.
    ///   An abandoned computation writes nothing, and the next caller for
    ///   `key` starts over.
    /// - Values cross the store as JSON. A computed value that cannot be read
    ///   back as `V` (a non-finite `f64` becomes `null`, for instance) is not
    ///   written; every joined caller gets `CacheError::Serialization`.
    ///
    /// # Errors
    ///
    /// - `CacheError::Compute` if the computation failed. Every joined
    ///   caller gets the same error and nothing is written.
    /// - `CacheError::Store` if the write-back failed.
    /// - `CacheError::Serialization` if the value cannot be converted to or
    ///   from JSON.
    pub async fn resolve<V, F, Fut, E>(
        &self,
        key: &str,
        compute: F,
        ttl: Option<Duration>,
    ) -> CacheResult<V>
    where
        V: Serialize + DeserializeOwned + Send + 'static,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<V, E>> + Send + 'static,
        E: Into<Box<dyn StdError + Send + Sync + 'static>> + Send + 'static,
    {
        if let Some(cached) = self.read(key).await.into_value() {
            match serde_json::from_value::<V>(cached) {
                Ok(value) => {
                    self.metrics.record_hit();
                    debug!(key = %key, "Cache hit");
                    return Ok(value);
                }
                Err(err) => {
                    warn!(key = %key, error = %err, "Cached value has unexpected shape; recomputing");
                }
            }
        }

        self.metrics.record_miss();
        let value = self.compute(key, compute, ttl).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Delete every key in `keys` from the store, in order.
    ///
    /// # Errors
    /// Returns the first store failure; later keys are left untouched.
    pub async fn evict<S: AsRef<str>>(&self, keys: &[S]) -> CacheResult<()> {
        for key in keys {
            let key = key.as_ref();
            self.store.del(key).await?;
            debug!(key = %key, "Evicted cache key");
        }
        Ok(())
    }

    /// The backing store.
    pub fn store(&self) -> &Arc<dyn CacheStore> {
        &self.store
    }

    /// Active configuration.
    pub fn config(&self) -> &CoalescerConfig {
        &self.config
    }

    /// Statistics snapshot.
    pub fn stats(&self) -> CoalescerStats {
        self.metrics.snapshot()
    }

    /// Number of keys with a store read in flight.
    pub fn pending_reads(&self) -> usize {
        self.reads.len()
    }

    /// Number of keys with a computation in flight.
    pub fn pending_computations(&self) -> usize {
        self.computations.len()
    }

    /// Returns `true` if anything is in flight for `key`.
    pub fn is_pending(&self, key: &str) -> bool {
        self.reads.contains(key) || self.computations.contains(key)
    }

    async fn read(&self, key: &str) -> CacheLookup {
        let store = Arc::clone(&self.store);
        let metrics = self.metrics.clone();
        let owned_key = key.to_owned();

        let (op, joined) = self.reads.join_or_start(key, move || {
            async move {
                match store.get(&owned_key).await {
                    Ok(value) => CacheLookup::from_store(value),
                    Err(err) => {
                        metrics.record_read_error();
                        warn!(key = %owned_key, error = %err, "Cache read failed; treating as miss");
                        CacheLookup::Missing
                    }
                }
            }
            .boxed()
        });

        if joined {
            self.metrics.record_read_joined();
            debug!(key = %key, "Joined in-flight cache read");
        }
        op.await
    }

    async fn compute<V, F, Fut, E>(
        &self,
        key: &str,
        compute: F,
        ttl: Option<Duration>,
    ) -> CacheResult<Value>
    where
        V: Serialize + DeserializeOwned + Send + 'static,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<V, E>> + Send + 'static,
        E: Into<Box<dyn StdError + Send + Sync + 'static>> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        let metrics = self.metrics.clone();
        let owned_key = key.to_owned();
        let ttl = self.config.ttl_convention.spec(self.config.effective_ttl(ttl));

        let (op, joined) = self.computations.join_or_start(key, move || {
            async move {
                metrics.record_computation();
                let value = match compute().await {
                    Ok(value) => serde_json::to_value(value)?,
                    Err(err) => {
                        metrics.record_compute_failure();
                        let err = CacheError::compute(owned_key.as_str(), err);
                        debug!(key = %owned_key, error = %err, "Computation failed");
                        return Err(err);
                    }
                };
                if let Err(err) = serde_json::from_value::<V>(value.clone()) {
                    warn!(key = %owned_key, error = %err, "Computed value does not round-trip; not caching");
                    return Err(err.into());
                }

                if let Err(err) = store.set(&owned_key, value.clone(), ttl).await {
                    metrics.record_write_failure();
                    warn!(key = %owned_key, error = %err, "Cache write-back failed");
                    return Err(err);
                }
                metrics.record_write();
                debug!(key = %owned_key, ttl = ?ttl.ttl(), "Cached computed value");
                Ok::<_, CacheError>(value)
            }
            .boxed()
        });

        if joined {
            self.metrics.record_computation_joined();
            debug!(key = %key, "Joined in-flight computation");
        }
        op.await
    }
}
