//! Coalescer configuration and builder

use std::time::Duration;

use cacheable_common::option_duration_millis;
use serde::{Deserialize, Serialize};

use crate::store_ports::TtlConvention;

/// Configuration for a [`Coalescer`](super::Coalescer)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CoalescerConfig {
    /// Write-call convention of the backing store
    pub ttl_convention: TtlConvention,

    /// Ttl used when `resolve` is called without one (None = store default)
    #[serde(with = "option_duration_millis")]
    pub default_ttl: Option<Duration>,
}

impl CoalescerConfig {
    /// Create a new configuration builder
    pub fn builder() -> CoalescerConfigBuilder {
        CoalescerConfigBuilder::default()
    }

    /// Preset for stores taking the ttl as a bare argument
    ///
    /// # Example
    /// ```
    /// use cacheable_core::{CoalescerConfig, TtlConvention};
    ///
    /// let config = CoalescerConfig::bare();
    /// assert_eq!(config.ttl_convention, TtlConvention::Bare);
    /// ```
    pub fn bare() -> Self {
        Self { ttl_convention: TtlConvention::Bare, default_ttl: None }
    }

    /// Preset for stores taking the ttl wrapped in an options structure
    pub fn wrapped() -> Self {
        Self { ttl_convention: TtlConvention::Wrapped, default_ttl: None }
    }

    /// Ttl to write with for a call that asked for `requested`.
    pub fn effective_ttl(&self, requested: Option<Duration>) -> Option<Duration> {
        requested.or(self.default_ttl)
    }
}

/// Builder for CoalescerConfig with fluent API
#[derive(Debug, Default)]
pub struct CoalescerConfigBuilder {
    config: CoalescerConfig,
}

impl CoalescerConfigBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the convention from the boolean compatibility flag
    pub fn bare_ttl(mut self, bare: bool) -> Self {
        self.config.ttl_convention = TtlConvention::from_bare_flag(bare);
        self
    }

    /// Set the write-call convention
    pub fn ttl_convention(mut self, convention: TtlConvention) -> Self {
        self.config.ttl_convention = convention;
        self
    }

    /// Set the ttl applied when a call does not supply one
    pub fn default_ttl(mut self, ttl: Duration) -> Self {
        self.config.default_ttl = Some(ttl);
        self
    }

    /// Build the configuration
    pub fn build(self) -> CoalescerConfig {
        self.config
    }
}
