//! Common utility functions and helper macros
//!
//! This module provides reusable utilities including:
//! - **[`macros`]**: label conversions for configuration enums
//! - **[`serde`]**: Serialization helpers for durations

#[macro_use]
pub mod macros;
pub mod serde;

// Re-export commonly used items for convenience
pub use self::serde::{duration_millis, option_duration_millis};
