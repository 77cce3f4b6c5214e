//! Configuration loading and management
//!
//! This module provides utilities for loading [`Settings`] from environment
//! variables and files.

pub mod loader;
mod settings;

// Re-export commonly used items
pub use loader::{load, load_from_env, load_from_file, parse_config, probe_config_paths};
pub use settings::Settings;
