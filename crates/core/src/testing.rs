//! In-memory [`CacheStore`] for tests
//!
//! [`MockStore`] records every call, can be told to fail any operation, and
//! can hold reads open for a while so concurrent callers overlap.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cacheable_common::{CacheError, CacheResult};
use parking_lot::Mutex;
use serde_json::Value;

use crate::store_ports::{CacheStore, TtlSpec};

/// One call observed by a [`MockStore`].
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    /// `get(key)`
    Get(String),
    /// `set(key, value, ttl)`
    Set(String, Value, TtlSpec),
    /// `del(key)`
    Del(String),
}

/// Recording in-memory store with scripted failures.
///
/// Clones share state, so a test can keep one handle while the coalescer
/// owns another.
#[derive(Debug, Clone, Default)]
pub struct MockStore {
    entries: Arc<Mutex<HashMap<String, Value>>>,
    calls: Arc<Mutex<Vec<StoreCall>>>,
    fail_gets: Arc<AtomicBool>,
    fail_sets: Arc<AtomicBool>,
    fail_dels: Arc<AtomicBool>,
    get_delay: Arc<Mutex<Option<Duration>>>,
}

impl MockStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed `key` with `value` without recording a call.
    pub fn with_entry<K: Into<String>>(self, key: K, value: Value) -> Self {
        self.entries.lock().insert(key.into(), value);
        self
    }

    /// Make every `get` fail.
    pub fn fail_gets(&self, fail: bool) {
        self.fail_gets.store(fail, Ordering::SeqCst);
    }

    /// Make every `set` fail.
    pub fn fail_sets(&self, fail: bool) {
        self.fail_sets.store(fail, Ordering::SeqCst);
    }

    /// Make every `del` fail.
    pub fn fail_dels(&self, fail: bool) {
        self.fail_dels.store(fail, Ordering::SeqCst);
    }

    /// Hold each `get` open for `delay` before answering.
    pub fn set_get_delay(&self, delay: Duration) {
        *self.get_delay.lock() = Some(delay);
    }

    /// Current value under `key`.
    pub fn entry(&self, key: &str) -> Option<Value> {
        self.entries.lock().get(key).cloned()
    }

    /// Every call observed so far, in order.
    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().clone()
    }

    /// Number of `get` calls.
    pub fn get_count(&self) -> usize {
        self.count(|call| matches!(call, StoreCall::Get(_)))
    }

    /// Number of `set` calls.
    pub fn set_count(&self) -> usize {
        self.count(|call| matches!(call, StoreCall::Set(..)))
    }

    /// Number of `del` calls.
    pub fn del_count(&self) -> usize {
        self.count(|call| matches!(call, StoreCall::Del(_)))
    }

    /// Every `set` call's ttl argument, in order.
    pub fn set_ttls(&self) -> Vec<TtlSpec> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                StoreCall::Set(_, _, ttl) => Some(*ttl),
                _ => None,
            })
            .collect()
    }

    fn count(&self, pred: impl Fn(&StoreCall) -> bool) -> usize {
        self.calls.lock().iter().filter(|call| pred(call)).count()
    }

    fn record(&self, call: StoreCall) {
        self.calls.lock().push(call);
    }
}

#[async_trait]
impl CacheStore for MockStore {
    async fn get(&self, key: &str) -> CacheResult<Option<Value>> {
        self.record(StoreCall::Get(key.to_owned()));

        let delay = *self.get_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail_gets.load(Ordering::SeqCst) {
            return Err(CacheError::store("get", key, "mock get failure"));
        }
        Ok(self.entries.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value, ttl: TtlSpec) -> CacheResult<()> {
        self.record(StoreCall::Set(key.to_owned(), value.clone(), ttl));
        if self.fail_sets.load(Ordering::SeqCst) {
            return Err(CacheError::store("set", key, "mock set failure"));
        }
        self.entries.lock().insert(key.to_owned(), value);
        Ok(())
    }

    async fn del(&self, key: &str) -> CacheResult<()> {
        self.record(StoreCall::Del(key.to_owned()));
        if self.fail_dels.load(Ordering::SeqCst) {
            return Err(CacheError::store("del", key, "mock del failure"));
        }
        self.entries.lock().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for testing::MockStore.
    use serde_json::json;

    use super::*;

    /// Validates `MockStore` behavior for the record and replay scenario.
    ///
    /// Assertions:
    /// - Confirms a seeded entry is returned by `get`.
    /// - Confirms `set` then `del` are recorded in order.
    #[tokio::test]
    async fn test_records_calls() {
        let store = MockStore::new().with_entry("a", json!(1));
        assert_eq!(store.get("a").await.unwrap(), Some(json!(1)));

        store.set("b", json!(2), TtlSpec::Bare(None)).await.unwrap();
        store.del("a").await.unwrap();

        assert_eq!(store.entry("a"), None);
        assert_eq!(store.entry("b"), Some(json!(2)));
        assert_eq!(
            store.calls(),
            vec![
                StoreCall::Get("a".into()),
                StoreCall::Set("b".into(), json!(2), TtlSpec::Bare(None)),
                StoreCall::Del("a".into()),
            ]
        );
    }

    /// Validates `MockStore::fail_sets` behavior for the scripted failure
    /// scenario.
    ///
    /// Assertions:
    /// - Confirms a failing `set` returns `CacheError::Store` and stores
    ///   nothing.
    #[tokio::test]
    async fn test_scripted_set_failure() {
        let store = MockStore::new();
        store.fail_sets(true);
        let err = store.set("k", json!("v"), TtlSpec::Bare(None)).await.unwrap_err();
        assert!(matches!(err, CacheError::Store { .. }));
        assert_eq!(store.entry("k"), None);
        assert_eq!(store.set_count(), 1);
    }
}
