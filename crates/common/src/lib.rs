//! Common utilities shared across the cacheable crates.
//!
//! - [`error`]: the `CacheError` taxonomy and its classification
//! - [`utils`]: serde helpers and label conversion macros used by the
//!   configuration layers

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod error;
#[macro_use]
pub mod utils;

// Re-export commonly used types and traits for convenience
pub use error::{
    CacheError, CacheResult, ComputeSource, ErrorClassification, ErrorSeverity, SharedError,
};
pub use utils::serde::{duration_millis, option_duration_millis};
