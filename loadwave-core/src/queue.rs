//! Job Queue
//!
//! Hands out job identifiers `0..n` exactly once each to concurrent
//! consumers. Exhaustion is signalled with `None`, which workers treat as
//! their termination sentinel rather than an error.

use std::sync::atomic::{AtomicU64, Ordering};

/// Lock-free dispenser of job identifiers.
///
/// All identifiers are "enqueued" up front: `take()` never blocks and no
/// producer adds work after construction. Across any number of concurrent
/// callers, each identifier in `0..total` is returned exactly once.
#[derive(Debug)]
pub struct JobQueue {
    next: AtomicU64,
    total: u64,
}

impl JobQueue {
    /// Create a queue holding job identifiers `0..total`.
    pub fn new(total: u64) -> Self {
        Self {
            next: AtomicU64::new(0),
            total,
        }
    }

    /// Take the next job identifier, or `None` once the queue is drained.
    ///
    /// Non-blocking. `None` is control flow, not an error.
    #[inline]
    pub fn take(&self) -> Option<u64> {
        // Relaxed is sufficient: the counter carries no data other workers
        // read through it.
        let id = self.next.fetch_add(1, Ordering::Relaxed);
        if id < self.total {
            Some(id)
        } else {
            None
        }
    }

    /// Total number of job identifiers this queue was created with.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Identifiers not yet taken.
    pub fn remaining(&self) -> u64 {
        self.total.saturating_sub(self.next.load(Ordering::Relaxed))
    }
}
