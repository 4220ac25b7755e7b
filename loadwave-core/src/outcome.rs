//! Outcomes and the Result Store
//!
//! Every processed job produces exactly one [`Outcome`]. Outcomes are
//! grouped into per-second buckets keyed by whole elapsed seconds since the
//! run started; within a bucket they appear in completion order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::Duration;

/// Result of a single workload invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    /// Whether the invocation succeeded.
    pub pass: bool,
    /// Wall-clock duration of the invocation.
    pub duration: Duration,
    /// Captured error detail for failures.
    pub error: Option<String>,
}

impl Outcome {
    /// A successful invocation.
    pub fn success(duration: Duration) -> Self {
        Self {
            pass: true,
            duration,
            error: None,
        }
    }

    /// A failed invocation with its captured error detail.
    pub fn failure(duration: Duration, error: impl Into<String>) -> Self {
        Self {
            pass: false,
            duration,
            error: Some(error.into()),
        }
    }

    /// Duration in fractional milliseconds.
    pub fn duration_ms(&self) -> f64 {
        self.duration.as_secs_f64() * 1000.0
    }
}

/// Outcomes keyed by elapsed-second bucket.
pub type Buckets = BTreeMap<u64, Vec<Outcome>>;

/// Thread-safe store of outcomes grouped by elapsed-second bucket.
///
/// Buckets are created lazily on first write. The read-or-create-then-append
/// sequence happens under one lock acquisition, so concurrent first writes
/// to a new bucket cannot lose each other.
#[derive(Debug, Default)]
pub struct ResultStore {
    buckets: Mutex<Buckets>,
}

impl ResultStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an outcome to the given bucket, creating the bucket if needed.
    ///
    /// Safe under unbounded concurrent callers.
    pub fn append(&self, bucket: u64, outcome: Outcome) {
        let mut buckets = self.buckets.lock().unwrap_or_else(|e| e.into_inner());
        buckets.entry(bucket).or_default().push(outcome);
    }

    /// A stable, internally consistent copy of the current buckets.
    pub fn snapshot(&self) -> Buckets {
        self.buckets
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// All outcomes across every bucket, flattened.
    pub fn all_outcomes(&self) -> Vec<Outcome> {
        self.buckets
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .flatten()
            .cloned()
            .collect()
    }

    /// Bucket keys currently present, in ascending order.
    pub fn bucket_keys(&self) -> Vec<u64> {
        self.buckets
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .keys()
            .copied()
            .collect()
    }

    /// Total number of recorded outcomes.
    pub fn total_recorded(&self) -> usize {
        self.buckets
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .map(Vec::len)
            .sum()
    }
}
