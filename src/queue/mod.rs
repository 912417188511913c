//! In-memory work queue shared by the scrape workers.
//!
//! The queue is populated in full before any worker starts and is drained to
//! empty; there is no producer running concurrently with the consumers and no
//! re-enqueue path. That keeps the contract small:
//!
//! - [`WorkQueue::enqueue`] appends at the tail (FIFO within one producer).
//! - [`WorkQueue::try_dequeue`] pops the head under a mutex without blocking,
//!   returning `None` once the queue is empty.
//! - Every enqueued item is delivered to exactly one caller, regardless of
//!   how many workers poll concurrently.

mod error;
mod item;

pub use error::QueueError;
pub use item::WorkItem;

use std::collections::VecDeque;
use std::sync::Mutex;

/// Mutex-guarded FIFO of pending work items.
///
/// Lock scope is a single push or pop; the mutex is never held across await
/// points, so a poisoned lock can only come from a panicking push/pop and is
/// treated as unreachable by recovering the inner queue.
#[derive(Debug, Default)]
pub struct WorkQueue {
    items: Mutex<VecDeque<WorkItem>>,
}

impl WorkQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an item at the tail of the queue.
    pub fn enqueue(&self, item: WorkItem) {
        self.lock().push_back(item);
    }

    /// Removes and returns the head of the queue, or `None` when empty.
    ///
    /// Never blocks waiting for new work; the queue is pre-populated before
    /// workers start.
    #[must_use]
    pub fn try_dequeue(&self) -> Option<WorkItem> {
        self.lock().pop_front()
    }

    /// Returns the number of items still pending.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true when no items are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<WorkItem>> {
        self.items
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    use super::*;

    #[test]
    fn test_empty_queue_dequeues_none() {
        let queue = WorkQueue::new();
        assert!(queue.is_empty());
        assert!(queue.try_dequeue().is_none());
    }

    #[test]
    fn test_fifo_order_for_single_producer() {
        let queue = WorkQueue::new();
        for version in 1..=5 {
            queue.enqueue(WorkItem::version(1818, version));
        }
        assert_eq!(queue.len(), 5);

        for version in 1..=5 {
            assert_eq!(queue.try_dequeue(), Some(WorkItem::version(1818, version)));
        }
        assert!(queue.try_dequeue().is_none());
    }

    #[test]
    fn test_concurrent_drain_delivers_each_item_exactly_once() {
        let queue = Arc::new(WorkQueue::new());
        let total = 500;
        for version in 1..=total {
            queue.enqueue(WorkItem::version(1, version));
        }

        let mut handles = Vec::new();
        for _ in 0..8 {
            let queue = Arc::clone(&queue);
            handles.push(thread::spawn(move || {
                let mut taken = Vec::new();
                while let Some(item) = queue.try_dequeue() {
                    taken.push(item);
                }
                taken
            }));
        }

        let mut seen = HashSet::new();
        let mut count = 0usize;
        for handle in handles {
            for item in handle.join().unwrap() {
                count += 1;
                match item {
                    WorkItem::Version { version, .. } => {
                        assert!(seen.insert(version), "version {version} delivered twice");
                    }
                    WorkItem::Hash { .. } => panic!("unexpected hash item"),
                }
            }
        }

        assert_eq!(count, total as usize, "lost items during concurrent drain");
        assert!(queue.is_empty());
    }

    #[test]
    fn test_mixed_addressing_modes_coexist() {
        let queue = WorkQueue::new();
        queue.enqueue(WorkItem::version(10, 1));
        queue.enqueue(WorkItem::hash("cafebabe").unwrap());

        assert_eq!(queue.try_dequeue(), Some(WorkItem::version(10, 1)));
        assert_eq!(queue.try_dequeue(), Some(WorkItem::hash("cafebabe").unwrap()));
    }
}
