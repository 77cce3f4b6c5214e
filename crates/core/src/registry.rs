//! Process-wide coalescer for interception layers that have no way to carry
//! an explicit handle.
//!
//! Installation is set-once. Code that can pass a [`Coalescer`] around
//! should do that instead.

use std::sync::Arc;

use cacheable_common::{CacheError, CacheResult};
use once_cell::sync::OnceCell;
use tracing::info;

use crate::coalesce::Coalescer;

static INSTALLED: OnceCell<Arc<Coalescer>> = OnceCell::new();

/// Install `coalescer` as the process-wide instance.
///
/// # Errors
/// Returns `CacheError::AlreadyInstalled` if one was installed before; the
/// existing instance stays in place.
pub fn install(coalescer: Coalescer) -> CacheResult<Arc<Coalescer>> {
    let shared = Arc::new(coalescer);
    INSTALLED.set(Arc::clone(&shared)).map_err(|_| CacheError::AlreadyInstalled)?;
    info!(convention = %shared.config().ttl_convention, "Installed process-wide coalescer");
    Ok(shared)
}

/// The process-wide coalescer.
///
/// # Errors
/// Returns `CacheError::NotInstalled` before [`install`] succeeded.
pub fn installed() -> CacheResult<Arc<Coalescer>> {
    try_installed().ok_or(CacheError::NotInstalled)
}

/// The process-wide coalescer, if installed.
pub fn try_installed() -> Option<Arc<Coalescer>> {
    INSTALLED.get().cloned()
}
