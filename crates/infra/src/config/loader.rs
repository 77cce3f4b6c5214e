//! Configuration loader
//!
//! Loads [`Settings`] from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If the convention variables are absent, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `CACHEABLE_TTL_CONVENTION`: Write-call convention label (`bare`/`v5`,
//!   `wrapped`/`options`/`legacy`/`v4`)
//! - `CACHEABLE_BARE_TTL`: Compatibility flag (true = bare ttl), used when
//!   `CACHEABLE_TTL_CONVENTION` is unset
//! - `CACHEABLE_DEFAULT_TTL_MS`: Ttl for calls that supply none
//! - `CACHEABLE_STORE_MAX_CAPACITY`: In-memory store capacity
//! - `CACHEABLE_STORE_DEFAULT_TTL_MS`: In-memory store default ttl
//!
//! One of the two convention variables must be set for environment loading
//! to succeed; the rest are optional.
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./cacheable.toml` or `./cacheable.json` (current working directory)
//! 2. `../cacheable.toml` or `../cacheable.json` (parent directory)
//! 3. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use cacheable_common::{CacheError, CacheResult};
use cacheable_core::TtlConvention;

use super::settings::Settings;

/// Config file names probed in each candidate directory.
const CONFIG_FILE_NAMES: [&str; 2] = ["cacheable.toml", "cacheable.json"];

/// Load settings with automatic fallback strategy
///
/// Loads from environment variables when a convention variable is set,
/// otherwise falls back to a config file.
///
/// # Errors
/// Returns `CacheError::Config` if:
/// - Settings cannot be loaded from either source
/// - File format is invalid
/// - A variable or field has an invalid value
pub fn load() -> CacheResult<Settings> {
    if !convention_in_env() {
        tracing::debug!("No convention in environment, trying file");
        return load_from_file(None);
    }

    let settings = load_from_env()?;
    tracing::info!("Configuration loaded from environment variables");
    Ok(settings)
}

/// Load settings from environment variables
///
/// # Environment Variables
/// See module documentation for the complete list.
///
/// # Errors
/// Returns `CacheError::Config` if no convention variable is set or any
/// variable has an invalid value.
pub fn load_from_env() -> CacheResult<Settings> {
    let ttl_convention = match std::env::var("CACHEABLE_TTL_CONVENTION").ok() {
        Some(label) => TtlConvention::from_str(&label)
            .map_err(|e| CacheError::config_field("CACHEABLE_TTL_CONVENTION", e))?,
        None => {
            let flag = env_var("CACHEABLE_BARE_TTL")?;
            TtlConvention::from_bare_flag(parse_bool("CACHEABLE_BARE_TTL", &flag)?)
        }
    };

    let mut settings = Settings::default();
    settings.coalescer.ttl_convention = ttl_convention;
    settings.coalescer.default_ttl = env_millis("CACHEABLE_DEFAULT_TTL_MS")?;
    if let Some(capacity) = env_parse::<u64>("CACHEABLE_STORE_MAX_CAPACITY")? {
        settings.store.max_capacity = capacity;
    }
    settings.store.default_ttl = env_millis("CACHEABLE_STORE_DEFAULT_TTL_MS")?;

    Ok(settings)
}

/// Load settings from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Arguments
/// * `path` - Optional path to config file. If `None`, uses
///   [`probe_config_paths`].
///
/// # Errors
/// Returns `CacheError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> CacheResult<Settings> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(CacheError::config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            CacheError::config("No config file found in any of the standard locations")
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| CacheError::config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse settings from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
///
/// # Errors
/// Returns `CacheError::Config` if format is invalid or parsing fails.
pub fn parse_config(contents: &str, path: &Path) -> CacheResult<Settings> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| CacheError::config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| CacheError::config(format!("Invalid JSON format: {e}"))),
        _ => Err(CacheError::config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// Searches the current working directory, its parent, and the directory
/// of the running executable for `cacheable.toml` then `cacheable.json`.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd.clone());
        dirs.push(cwd.join(".."));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.push(exe_dir.to_path_buf());
        }
    }

    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

/// Get required environment variable
///
/// # Errors
/// Returns `CacheError::Config` naming the variable if it is not set.
fn env_var(key: &str) -> CacheResult<String> {
    std::env::var(key)
        .map_err(|_| CacheError::config_field(key, "Missing required environment variable"))
}

fn convention_in_env() -> bool {
    std::env::var_os("CACHEABLE_TTL_CONVENTION").is_some()
        || std::env::var_os("CACHEABLE_BARE_TTL").is_some()
}

/// Parse an optional environment variable
///
/// # Errors
/// Returns `CacheError::Config` if the variable is set but does not parse.
fn env_parse<T>(key: &str) -> CacheResult<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| CacheError::config_field(key, format!("Invalid value '{raw}': {e}"))),
        Err(_) => Ok(None),
    }
}

fn env_millis(key: &str) -> CacheResult<Option<Duration>> {
    Ok(env_parse::<u64>(key)?.map(Duration::from_millis))
}

/// Parse a boolean flag
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
///
/// # Errors
/// Returns `CacheError::Config` for any other value.
fn parse_bool(key: &str, raw: &str) -> CacheResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(CacheError::config_field(key, format!("Invalid boolean '{raw}'"))),
    }
}
