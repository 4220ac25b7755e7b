//! Summary Statistics
//!
//! Derived read-only statistics over a set of recorded outcomes. All timing
//! figures are fractional milliseconds. Statistics are always computable
//! from whatever outcomes exist, including none at all.

use crate::outcome::Buckets;
use serde::{Deserialize, Serialize};

/// Aggregate statistics for a run (or a partial snapshot of one).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    /// Smallest recorded duration in milliseconds, 0 when empty.
    pub min_ms: f64,
    /// Largest recorded duration in milliseconds, 0 when empty.
    pub max_ms: f64,
    /// Arithmetic mean duration in milliseconds, 0 (not NaN) when empty.
    pub avg_ms: f64,
    /// Number of successful invocations.
    pub success: u64,
    /// Number of failed invocations.
    pub errors: u64,
}

impl RunStats {
    /// Total number of recorded outcomes.
    pub fn total(&self) -> u64 {
        self.success + self.errors
    }
}

/// Compute summary statistics over every outcome in the given buckets.
pub fn compute_stats(buckets: &Buckets) -> RunStats {
    let mut min_ms = f64::MAX;
    let mut max_ms: f64 = 0.0;
    let mut sum_ms: f64 = 0.0;
    let mut success: u64 = 0;
    let mut errors: u64 = 0;

    for outcome in buckets.values().flatten() {
        let ms = outcome.duration_ms();
        min_ms = min_ms.min(ms);
        max_ms = max_ms.max(ms);
        sum_ms += ms;
        if outcome.pass {
            success += 1;
        } else {
            errors += 1;
        }
    }

    let count = success + errors;
    if count == 0 {
        return RunStats {
            min_ms: 0.0,
            max_ms: 0.0,
            avg_ms: 0.0,
            success: 0,
            errors: 0,
        };
    }

    RunStats {
        min_ms,
        max_ms,
        avg_ms: sum_ms / count as f64,
        success,
        errors,
    }
}
