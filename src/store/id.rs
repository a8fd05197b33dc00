use std::sync::atomic::{AtomicU64, Ordering};

use super::EntityId;

/// Race-free source of monotonically increasing identifiers.
///
/// Each store owns exactly one allocator. Allocation is a single atomic
/// increment, deliberately outside the store's general lock path, so
/// concurrent inserts can never observe a stale counter value.
pub struct IdAllocator {
    next: AtomicU64,
}

impl IdAllocator {
    /// A fresh sequence starting at 1.
    pub fn new() -> Self {
        IdAllocator {
            next: AtomicU64::new(1),
        }
    }

    /// Claim the next identifier. Between resets, never returns the same
    /// value twice, regardless of how many threads allocate concurrently.
    pub fn next_id(&self) -> EntityId {
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    /// The identifier the next `next_id` call would return.
    pub fn peek_next(&self) -> EntityId {
        self.next.load(Ordering::Relaxed)
    }

    /// Restart the sequence at 1. Only store initialization uses this;
    /// identifiers are never reused during normal operation.
    pub fn reset(&self) {
        self.next.store(1, Ordering::Relaxed);
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
