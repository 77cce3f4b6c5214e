//! Cache store port.
//!
//! The coalescer never stores anything itself; it drives one pluggable
//! backend through [`CacheStore`]. Values cross the port as JSON so that a
//! single store can hold the results of every cached method regardless of
//! their Rust types.
//!
//! # Example
//!
//! ```no_run
//! use cacheable_core::{CacheStore, TtlConvention};
//! use std::time::Duration;
//!
//! async fn warm(store: &impl CacheStore) -> cacheable_common::CacheResult<()> {
//!     let ttl = TtlConvention::Bare.spec(Some(Duration::from_secs(30)));
//!     store.set("users@42", serde_json::json!({ "name": "Ada" }), ttl).await
//! }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use cacheable_common::{impl_label_conversions, option_duration_millis, CacheResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Options structure carrying the ttl for stores using the legacy
/// write-call convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SetOptions {
    /// Time-to-live for the written entry (`None` = store default)
    #[serde(default, with = "option_duration_millis")]
    pub ttl: Option<Duration>,
}

/// Ttl argument handed to [`CacheStore::set`].
///
/// The two shapes are incompatible on the wire of real stores, so the
/// coalescer picks one per [`TtlConvention`] and never mixes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TtlSpec {
    /// Current convention: the duration is passed directly
    Bare(Option<Duration>),
    /// Legacy convention: the duration is wrapped as `{ ttl }`
    Options(SetOptions),
}

impl TtlSpec {
    /// The requested ttl regardless of convention.
    pub fn ttl(&self) -> Option<Duration> {
        match self {
            Self::Bare(ttl) => *ttl,
            Self::Options(options) => options.ttl,
        }
    }
}

/// Which write-call convention the active store expects.
///
/// Config files and environment variables accept the same labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum TtlConvention {
    /// `set(key, value, ttl)`
    Bare,
    /// `set(key, value, { ttl })`
    #[default]
    Wrapped,
}

impl_label_conversions!(TtlConvention {
    Bare => "bare" | "v5",
    Wrapped => "wrapped" | "options" | "legacy" | "v4",
});

impl TryFrom<String> for TtlConvention {
    type Error = String;

    fn try_from(label: String) -> Result<Self, Self::Error> {
        label.parse()
    }
}

impl TtlConvention {
    /// Shape `ttl` the way this convention requires.
    pub fn spec(self, ttl: Option<Duration>) -> TtlSpec {
        match self {
            Self::Bare => TtlSpec::Bare(ttl),
            Self::Wrapped => TtlSpec::Options(SetOptions { ttl }),
        }
    }

    /// Convention selected by the boolean compatibility flag (`true` = bare).
    pub fn from_bare_flag(bare: bool) -> Self {
        if bare {
            Self::Bare
        } else {
            Self::Wrapped
        }
    }
}

/// Port for the backing cache store.
///
/// Implementations must be safe to call concurrently. `get` distinguishes a
/// missing entry (`Ok(None)`) from a stored JSON `null` (`Ok(Some(Value::Null))`).
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Look up `key`.
    async fn get(&self, key: &str) -> CacheResult<Option<Value>>;

    /// Write `value` under `key` with the given ttl shape.
    async fn set(&self, key: &str, value: Value, ttl: TtlSpec) -> CacheResult<()>;

    /// Remove `key`. Removing a missing key is not an error.
    async fn del(&self, key: &str) -> CacheResult<()>;
}
