//! Wiring settings into a ready [`Coalescer`].

use std::sync::Arc;

use cacheable_common::CacheResult;
use cacheable_core::{registry, Coalescer};

use crate::config::{self, Settings};
use crate::stores::MemoryStore;

/// Build a coalescer over a fresh [`MemoryStore`] sized by `settings`.
pub fn build_coalescer(settings: &Settings) -> Coalescer {
    tracing::info!(
        convention = %settings.coalescer.ttl_convention,
        max_capacity = settings.store.max_capacity,
        "Building coalescer over in-memory store"
    );
    Coalescer::new(Arc::new(MemoryStore::new(settings.store)), settings.coalescer)
}

/// Load settings, build a coalescer and install it process-wide.
///
/// # Errors
/// Returns `CacheError::Config` if settings cannot be loaded and
/// `CacheError::AlreadyInstalled` if a coalescer was installed before.
pub fn install_from_config() -> CacheResult<Arc<Coalescer>> {
    let settings = config::load()?;
    registry::install(build_coalescer(&settings))
}
