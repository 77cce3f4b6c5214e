//! Coalescer statistics
//!
//! Counters are per [`Coalescer`](super::Coalescer) and shared by its clones.
//! Per-caller outcomes (`hits`, `misses`, `*_joined`) are counted once per
//! `resolve` call; per-operation outcomes (`computations`, `writes`, failures)
//! once per shared operation, however many callers joined it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Snapshot of coalescer activity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoalescerStats {
    /// Calls answered from the store
    pub hits: u64,

    /// Calls that went on to the computation path
    pub misses: u64,

    /// Store reads that failed and were treated as misses
    pub read_errors: u64,

    /// Calls that joined an in-flight store read
    pub reads_joined: u64,

    /// Computations started
    pub computations: u64,

    /// Calls that joined an in-flight computation
    pub computations_joined: u64,

    /// Computations that failed
    pub compute_failures: u64,

    /// Successful write-backs
    pub writes: u64,

    /// Write-backs the store rejected
    pub write_failures: u64,
}

impl CoalescerStats {
    /// Calculate hit rate (hits / resolve calls)
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Total number of `resolve` calls that got past key lookup
    pub fn total_resolves(&self) -> u64 {
        self.hits + self.misses
    }
}

/// Lock-free counters behind [`CoalescerStats`]
#[derive(Debug, Clone, Default)]
pub(crate) struct MetricsCollector {
    counters: Arc<Counters>,
}

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    read_errors: AtomicU64,
    reads_joined: AtomicU64,
    computations: AtomicU64,
    computations_joined: AtomicU64,
    compute_failures: AtomicU64,
    writes: AtomicU64,
    write_failures: AtomicU64,
}

impl MetricsCollector {
    pub(crate) fn record_hit(&self) {
        self.counters.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        self.counters.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_read_error(&self) {
        self.counters.read_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_read_joined(&self) {
        self.counters.reads_joined.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_computation(&self) {
        self.counters.computations.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_computation_joined(&self) {
        self.counters.computations_joined.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_compute_failure(&self) {
        self.counters.compute_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_write(&self) {
        self.counters.writes.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_write_failure(&self) {
        self.counters.write_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current statistics snapshot
    pub(crate) fn snapshot(&self) -> CoalescerStats {
        let c = &self.counters;
        CoalescerStats {
            hits: c.hits.load(Ordering::Relaxed),
            misses: c.misses.load(Ordering::Relaxed),
            read_errors: c.read_errors.load(Ordering::Relaxed),
            reads_joined: c.reads_joined.load(Ordering::Relaxed),
            computations: c.computations.load(Ordering::Relaxed),
            computations_joined: c.computations_joined.load(Ordering::Relaxed),
            compute_failures: c.compute_failures.load(Ordering::Relaxed),
            writes: c.writes.load(Ordering::Relaxed),
            write_failures: c.write_failures.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for coalesce::stats.
    use super::*;

    /// Validates `CoalescerStats::hit_rate` behavior for the no calls
    /// scenario.
    ///
    /// Assertions:
    /// - Confirms `stats.hit_rate()` equals `0.0`.
    #[test]
    fn test_hit_rate_without_calls() {
        assert_eq!(CoalescerStats::default().hit_rate(), 0.0);
    }

    /// Validates `MetricsCollector` behavior for the shared counters scenario.
    ///
    /// Assertions:
    /// - Confirms counts recorded through a clone show in the original's
    ///   snapshot.
    /// - Ensures `(stats.hit_rate() - 0.75).abs() < 1e-10` evaluates to true.
    #[test]
    fn test_clones_share_counters() {
        let metrics = MetricsCollector::default();
        let clone = metrics.clone();
        for _ in 0..3 {
            clone.record_hit();
        }
        metrics.record_miss();
        metrics.record_write();

        let stats = metrics.snapshot();
        assert_eq!(stats.hits, 3);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.writes, 1);
        assert_eq!(stats.total_resolves(), 4);
        assert!((stats.hit_rate() - 0.75).abs() < 1e-10);
    }
}
