//! Error types shared by the cacheable crates
//!
//! The error handling system is built on three key components:
//!
//! 1. **`CacheError`**: every failure the key composer, the coalescing
//!    executor and the store adapters can surface.
//!
//! 2. **`ErrorClassification` trait**: a standard interface for classifying
//!    errors by retryability, severity and criticality.
//!
//! 3. **`ErrorSeverity` enum**: a unified severity level for logging and
//!    alerting.
//!
//! ## Sharing one failure between many waiters
//!
//! Coalesced operations hand the *same* result to every caller that joined
//! them, so `CacheError` is `Clone`. Foreign error sources are held behind an
//! [`Arc`] instead of a `Box` for that reason.
//!
//! ```rust
//! use cacheable_common::error::{CacheError, ErrorClassification, ErrorSeverity};
//!
//! let err = CacheError::store("get", "users@42", "connection reset");
//! assert!(err.is_retryable());
//! assert_eq!(err.severity(), ErrorSeverity::Warning);
//!
//! let shared = err.clone();
//! assert_eq!(shared.to_string(), err.to_string());
//! ```

use std::error::Error as StdError;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use thiserror::Error;

/// A foreign error that can be handed to several waiters at once.
pub type SharedError = Arc<dyn StdError + Send + Sync + 'static>;

/// Standard result type using `CacheError`
pub type CacheResult<T> = Result<T, CacheError>;

/// Failures surfaced by key composition, coalesced resolution and stores.
///
/// The `source()` of a `Compute` error is the computation's own error, so
/// callers can downcast it to the type they returned.
#[derive(Debug, Clone, Error)]
pub enum CacheError {
    /// The backing cache store rejected an operation.
    #[error("Cache store error during '{operation}' for key '{key}': {message}")]
    Store { operation: String, key: String, message: String },

    /// The fallback computation failed. Every coalesced waiter receives this.
    #[error("Computation for key '{key}' failed: {source}")]
    Compute {
        key: String,
        #[source]
        source: ComputeSource,
    },

    /// A value or argument list could not be converted to or from JSON.
    #[error("Serialization error ({format}): {message}")]
    Serialization { format: String, message: String },

    /// Key material produced no usable cache key.
    #[error("Invalid cache key: {reason}")]
    InvalidKey { reason: String },

    /// Configuration could not be loaded or is inconsistent.
    #[error("{}", config_message(.field.as_deref(), .message))]
    Config { message: String, field: Option<String> },

    /// The process-wide coalescer was installed twice.
    #[error("A process-wide coalescer is already installed")]
    AlreadyInstalled,

    /// The process-wide coalescer was used before installation.
    #[error("No process-wide coalescer has been installed")]
    NotInstalled,
}

/// The shared error of a failed computation.
///
/// Derefs to the computation's error. It does not implement
/// `Error` itself, so the `source()` of a `Compute` error is the wrapped
/// error rather than the wrapper.
#[derive(Debug, Clone)]
pub struct ComputeSource(SharedError);

impl ComputeSource {
    /// The shared handle, for comparing or re-sharing the error.
    pub fn shared(&self) -> &SharedError {
        &self.0
    }
}

impl Deref for ComputeSource {
    type Target = dyn StdError + Send + Sync + 'static;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}

impl fmt::Display for ComputeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.0, f)
    }
}

fn config_message(field: Option<&str>, message: &str) -> String {
    match field {
        Some(field) => format!("Configuration error in field '{field}': {message}"),
        None => format!("Configuration error: {message}"),
    }
}

impl CacheError {
    /// Create a store error for `operation` (`get`, `set`, `del`) on `key`.
    pub fn store<O, K, M>(operation: O, key: K, message: M) -> Self
    where
        O: Into<String>,
        K: Into<String>,
        M: Into<String>,
    {
        Self::Store { operation: operation.into(), key: key.into(), message: message.into() }
    }

    /// Wrap a failed computation for `key`.
    pub fn compute<K, E>(key: K, error: E) -> Self
    where
        K: Into<String>,
        E: Into<Box<dyn StdError + Send + Sync + 'static>>,
    {
        Self::Compute { key: key.into(), source: ComputeSource(Arc::from(error.into())) }
    }

    /// Create a serialization error for the given wire format.
    pub fn serialization<F: Into<String>, M: Into<String>>(format: F, message: M) -> Self {
        Self::Serialization { format: format.into(), message: message.into() }
    }

    /// Create an invalid key error
    pub fn invalid_key<S: Into<String>>(reason: S) -> Self {
        Self::InvalidKey { reason: reason.into() }
    }

    /// Create a simple configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into(), field: None }
    }

    /// Create a configuration error for a specific field
    pub fn config_field<F: Into<String>, S: Into<String>>(field: F, message: S) -> Self {
        Self::Config { message: message.into(), field: Some(field.into()) }
    }

    /// Stable label suitable for log fields and metric tags.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Store { .. } => "store",
            Self::Compute { .. } => "compute",
            Self::Serialization { .. } => "serialization",
            Self::InvalidKey { .. } => "invalid_key",
            Self::Config { .. } => "config",
            Self::AlreadyInstalled => "already_installed",
            Self::NotInstalled => "not_installed",
        }
    }

    /// The cache key this error is about, when it concerns a single key.
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Store { key, .. } | Self::Compute { key, .. } => Some(key),
            _ => None,
        }
    }
}

/// Trait for classifying errors by their characteristics
pub trait ErrorClassification {
    /// Check if this error is retryable
    ///
    /// Nothing in the cacheable crates retries on its own; this exists for
    /// callers that wrap `resolve` in their own retry policy.
    fn is_retryable(&self) -> bool;

    /// Get the error severity level
    fn severity(&self) -> ErrorSeverity;

    /// Check if this is a critical error requiring immediate attention
    fn is_critical(&self) -> bool;
}

impl ErrorClassification for CacheError {
    fn is_retryable(&self) -> bool {
        matches!(self, Self::Store { .. })
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Store { .. } | Self::AlreadyInstalled => ErrorSeverity::Warning,
            Self::Compute { .. }
            | Self::Serialization { .. }
            | Self::InvalidKey { .. }
            | Self::Config { .. } => ErrorSeverity::Error,
            Self::NotInstalled => ErrorSeverity::Critical,
        }
    }

    fn is_critical(&self) -> bool {
        matches!(self, Self::NotInstalled)
    }
}

/// Error severity levels for monitoring and alerting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Informational, typically for debugging
    Info,
    /// Warning, should be monitored but not critical
    Warning,
    /// Error, requires attention and action
    Error,
    /// Critical, immediate action required
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

// Standard conversions from common error types
impl From<serde_json::Error> for CacheError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization("JSON", err.to_string())
    }
}
