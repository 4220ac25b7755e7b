#![warn(missing_docs)]
//! Loadwave Core - Concurrent Load-Test Engine
//!
//! This crate provides the job-distribution, concurrent-execution, and
//! result-aggregation engine:
//! - [`JobQueue`] hands each job identifier to exactly one worker
//! - [`WorkerPool`] runs the workload on a fixed set of threads
//! - [`ResultStore`] aggregates outcomes into per-second buckets
//! - [`LoadTest`] orchestrates the run, computes summary statistics, and
//!   fires checkpoint exports through the [`ReportSink`] / [`ArtifactUploader`]
//!   seams
//!
//! Rendering, uploading, and progress display live behind traits; the
//! `loadwave-report` and `loadwave-cli` crates supply the implementations.

mod export;
mod outcome;
mod pool;
mod queue;
mod runner;
mod stats;

pub use export::{ArtifactUploader, CheckpointError, ReportOptions, ReportSink};
pub use outcome::{Buckets, Outcome, ResultStore};
pub use pool::{workload, PoolError, ProgressFn, WorkerContext, WorkerPool, Workload};
pub use queue::JobQueue;
pub use runner::{ConfigError, LoadTest, RunConfig, RunError, RunPhase};
pub use stats::{compute_stats, RunStats};
