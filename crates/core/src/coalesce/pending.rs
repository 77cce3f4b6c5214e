//! Tables of in-flight operations keyed by final cache key.
//!
//! An entry is inserted by the first caller for a key and removed by the
//! operation itself as it settles, before any waiter observes the result.
//! Callers arriving after that start a fresh operation.
//!
//! Slots hold only a weak handle. When every caller awaiting an operation
//! has been dropped the operation is dropped with them, its settle guard
//! runs, and the slot goes away.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures::future::{BoxFuture, FutureExt, Shared, WeakShared};

/// An in-flight operation every joined caller awaits.
pub(crate) type SharedOp<T> = Shared<BoxFuture<'static, T>>;

struct Slot<T: Clone> {
    id: u64,
    op: WeakShared<BoxFuture<'static, T>>,
}

/// Concurrent map from cache key to the single in-flight operation for it.
pub(crate) struct PendingTable<T: Clone> {
    slots: Arc<DashMap<String, Slot<T>>>,
    next_id: Arc<AtomicU64>,
}

impl<T: Clone> Clone for PendingTable<T> {
    fn clone(&self) -> Self {
        Self { slots: Arc::clone(&self.slots), next_id: Arc::clone(&self.next_id) }
    }
}

impl<T: Clone> Default for PendingTable<T> {
    fn default() -> Self {
        Self { slots: Arc::new(DashMap::new()), next_id: Arc::new(AtomicU64::new(0)) }
    }
}

impl<T> PendingTable<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Join the operation in flight for `key`, or start one with `start`.
    ///
    /// Lookup and insert happen under one shard lock, so two callers can
    /// never both start. `start` only builds the future; nothing it wraps
    /// runs until the returned operation is first polled.
    ///
    /// Returns the operation and whether it was joined rather than started.
    pub(crate) fn join_or_start<F>(&self, key: &str, start: F) -> (SharedOp<T>, bool)
    where
        F: FnOnce() -> BoxFuture<'static, T>,
    {
        let entry = self.slots.entry(key.to_owned());
        if let Entry::Occupied(occupied) = &entry {
            // An abandoned operation's slot lingers until its guard runs.
            if let Some(op) = occupied.get().op.upgrade() {
                return (op, true);
            }
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let settle = Settle { slots: Arc::clone(&self.slots), key: key.to_owned(), id };
        let work = start();
        let op = async move {
            let _settle = settle;
            work.await
        }
        .boxed()
        .shared();

        if let Some(weak) = op.downgrade() {
            let slot = Slot { id, op: weak };
            match entry {
                Entry::Occupied(mut occupied) => {
                    occupied.insert(slot);
                }
                Entry::Vacant(vacant) => {
                    vacant.insert(slot);
                }
            }
        }
        (op, false)
    }
}

impl<T: Clone> PendingTable<T> {
    /// Number of keys with an operation in flight.
    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if an operation for `key` is in flight.
    pub(crate) fn contains(&self, key: &str) -> bool {
        self.slots.contains_key(key)
    }
}

/// Removes its operation's slot when the operation finishes, unwinds or is
/// dropped unfinished.
struct Settle<T: Clone> {
    slots: Arc<DashMap<String, Slot<T>>>,
    key: String,
    id: u64,
}

impl<T: Clone> Drop for Settle<T> {
    fn drop(&mut self) {
        // Only our own slot; a newer operation may already own the key.
        self.slots.remove_if(&self.key, |_, slot| slot.id == self.id);
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for coalesce::pending.
    use std::sync::atomic::AtomicUsize;

    use tokio::sync::oneshot;

    use super::*;

    /// Validates `PendingTable::join_or_start` behavior for the join in
    /// flight scenario.
    ///
    /// Assertions:
    /// - Confirms the second caller joins and does not run its start closure.
    /// - Confirms both callers observe the first operation's output.
    /// - Confirms the entry is gone once the operation settles.
    #[tokio::test]
    async fn test_second_caller_joins() {
        let table = PendingTable::<u32>::default();
        let (tx, rx) = oneshot::channel::<u32>();
        let started = Arc::new(AtomicUsize::new(0));

        let (first, joined_first) = table.join_or_start("k", || {
            started.fetch_add(1, Ordering::SeqCst);
            async move { rx.await.unwrap_or(0) }.boxed()
        });
        let (second, joined_second) = table.join_or_start("k", || {
            started.fetch_add(1, Ordering::SeqCst);
            async { 99 }.boxed()
        });

        assert!(!joined_first);
        assert!(joined_second);
        assert_eq!(started.load(Ordering::SeqCst), 1);
        assert!(table.contains("k"));

        tx.send(7).unwrap();
        let (a, b) = futures::join!(first, second);
        assert_eq!((a, b), (7, 7));
        assert_eq!(table.len(), 0);
    }

    /// Validates `PendingTable::join_or_start` behavior for the fresh
    /// operation after settlement scenario.
    ///
    /// Assertions:
    /// - Confirms a caller arriving after settlement starts a new operation.
    #[tokio::test]
    async fn test_settled_key_starts_fresh() {
        let table = PendingTable::<&'static str>::default();

        let (op, _) = table.join_or_start("k", || async { "first" }.boxed());
        assert_eq!(op.await, "first");

        let (op, joined) = table.join_or_start("k", || async { "second" }.boxed());
        assert!(!joined);
        assert_eq!(op.await, "second");
        assert!(!table.contains("k"));
    }

    /// Validates `Settle` behavior for the stale settlement scenario.
    ///
    /// Assertions:
    /// - Confirms dropping a settle guard for an old slot id leaves the newer
    ///   operation in place.
    #[tokio::test]
    async fn test_stale_settle_keeps_newer_slot() {
        let table = PendingTable::<u8>::default();
        let (_op, _) = table.join_or_start("k", || futures::future::pending().boxed());

        let stale = Settle { slots: Arc::clone(&table.slots), key: "k".to_owned(), id: u64::MAX };
        drop(stale);

        assert!(table.contains("k"));
    }

    /// Validates `PendingTable::join_or_start` behavior for the abandoned
    /// operation scenario.
    ///
    /// Assertions:
    /// - Confirms dropping every handle of an unfinished operation removes
    ///   its slot.
    /// - Confirms the next caller starts a fresh operation.
    #[tokio::test]
    async fn test_abandoned_operation_is_removed() {
        let table = PendingTable::<u8>::default();
        let (op, _) = table.join_or_start("k", || futures::future::pending().boxed());
        let (joined, was_joined) = table.join_or_start("k", || async { 0 }.boxed());
        assert!(was_joined);

        drop(op);
        assert!(table.contains("k"));
        drop(joined);
        assert!(!table.contains("k"));

        let (op, joined) = table.join_or_start("k", || async { 5 }.boxed());
        assert!(!joined);
        assert_eq!(op.await, 5);
    }

    /// Validates `PendingTable::join_or_start` behavior for a lingering
    /// abandoned slot.
    ///
    /// Assertions:
    /// - Confirms a slot whose operation is gone is replaced, not joined.
    #[tokio::test]
    async fn test_dead_slot_is_replaced() {
        let table = PendingTable::<u8>::default();
        let (op, _) = table.join_or_start("k", || async { 1 }.boxed());
        let dead = op.downgrade().unwrap();
        drop(op);
        table.slots.insert("k".to_owned(), Slot { id: u64::MAX, op: dead });

        let (op, joined) = table.join_or_start("k", || async { 2 }.boxed());
        assert!(!joined);
        assert_eq!(op.await, 2);
        assert!(!table.contains("k"));
    }

    /// Validates `PendingTable` behavior for the independent keys scenario.
    ///
    /// Assertions:
    /// - Confirms operations for different keys are not shared.
    #[tokio::test]
    async fn test_keys_are_independent() {
        let table = PendingTable::<u8>::default();
        let (a, joined_a) = table.join_or_start("a", || async { 1 }.boxed());
        let (b, joined_b) = table.join_or_start("b", || async { 2 }.boxed());
        assert!(!joined_a && !joined_b);
        assert_eq!(table.len(), 2);
        assert_eq!((a.await, b.await), (1, 2));
    }
}
