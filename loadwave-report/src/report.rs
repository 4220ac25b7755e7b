//! Report Data Structures

use chrono::{DateTime, Utc};
use loadwave_core::{compute_stats, Buckets, RunStats};
use serde::{Deserialize, Serialize};

/// Complete load-test report built from a result snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Presentation metadata.
    pub meta: ReportMeta,
    /// One row per elapsed-second bucket, ascending.
    pub rows: Vec<BucketRow>,
    /// Aggregate statistics over every outcome in the snapshot.
    pub summary: RunStats,
}

/// Report metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    /// Report headline.
    pub header: String,
    /// Free-form description shown under the headline.
    pub description: String,
    /// When this report was built.
    pub generated_at: DateTime<Utc>,
}

/// Per-second aggregate of outcomes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketRow {
    /// Whole elapsed seconds since run start.
    pub second: u64,
    /// Successful invocations completed in this second.
    pub success: u64,
    /// Failed invocations completed in this second.
    pub errors: u64,
    /// Smallest duration in this second, milliseconds.
    pub min_ms: f64,
    /// Largest duration in this second, milliseconds.
    pub max_ms: f64,
    /// Mean duration in this second, milliseconds.
    pub avg_ms: f64,
}

impl BucketRow {
    /// Total invocations completed in this second.
    pub fn total(&self) -> u64 {
        self.success + self.errors
    }
}

/// Build a report from a snapshot of accumulated results.
///
/// Pure over the snapshot contents apart from the `generated_at` stamp:
/// building twice from an unchanged snapshot yields identical rows and
/// summary.
pub fn build_report(snapshot: &Buckets, header: &str, description: &str) -> Report {
    let rows = snapshot
        .iter()
        .map(|(&second, outcomes)| {
            let mut success = 0u64;
            let mut errors = 0u64;
            let mut min_ms = f64::MAX;
            let mut max_ms: f64 = 0.0;
            let mut sum_ms: f64 = 0.0;
            for outcome in outcomes {
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
            let count = (success + errors).max(1);
            BucketRow {
                second,
                success,
                errors,
                min_ms: if outcomes.is_empty() { 0.0 } else { min_ms },
                max_ms,
                avg_ms: sum_ms / count as f64,
            }
        })
        .collect();

    Report {
        meta: ReportMeta {
            header: header.to_string(),
            description: description.to_string(),
            generated_at: Utc::now(),
        },
        rows,
        summary: compute_stats(snapshot),
    }
}
