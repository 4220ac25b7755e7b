#![warn(missing_docs)]
//! # Loadwave
//!
//! Concurrent load-testing harness. Loadwave repeatedly executes a
//! caller-supplied workload across a bounded pool of workers, measures
//! per-invocation latency and success/failure, aggregates outcomes into
//! per-second buckets, and periodically exports a checkpoint report
//! (optionally uploaded to remote storage) while the run is still going.
//!
//! - **Exactly-once dispatch**: each job identifier is handed to one worker
//! - **Failure isolation**: a failing (or panicking) workload invocation is
//!   recorded, never retried, and never takes down a worker
//! - **Live checkpoints**: accumulated results are rendered to an HTML
//!   artifact at pool-size boundaries during the run
//! - **Always-computable statistics**: min/avg/max latency and
//!   success/error counts work on whatever outcomes exist
//!
//! ## Quick Start
//!
//! ```ignore
//! use loadwave::workload;
//!
//! fn main() -> anyhow::Result<()> {
//!     loadwave::run(workload(|| {
//!         call_my_service()?;
//!         Ok(())
//!     }))
//! }
//! ```
//!
//! ## Library Use
//!
//! ```ignore
//! use loadwave::{workload, LoadTest, RunConfig};
//!
//! let test = LoadTest::new(RunConfig { total_jobs: 500, pool_size: 50, ..Default::default() })?;
//! let stats = test.run(workload(|| Ok(())))?;
//! println!("avg {:.2} ms over {} requests", stats.avg_ms, stats.total());
//! ```

// Re-export core types
pub use loadwave_core::{
    compute_stats, workload, ArtifactUploader, Buckets, CheckpointError, ConfigError, JobQueue,
    LoadTest, Outcome, ProgressFn, ReportOptions, ReportSink, ResultStore, RunConfig, RunError,
    RunPhase, RunStats, WorkerPool, Workload,
};

// Re-export reporting
pub use loadwave_report::{
    build_report, generate_html_report, generate_json_report, BucketRow, HtmlReportSink,
    HttpUploader, OutputFormat, Report, ReportMeta, UploadError,
};

// Re-export CLI surface
pub use loadwave_cli::{format_human_output, run_with_cli, Cli, LoadwaveConfig};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{workload, LoadTest, Outcome, ResultStore, RunConfig, RunPhase, RunStats};
}

/// Run the Loadwave CLI harness.
///
/// Call this from your load-test binary's `main()`:
/// ```ignore
/// fn main() -> anyhow::Result<()> {
///     loadwave::run(loadwave::workload(|| Ok(())))
/// }
/// ```
pub use loadwave_cli::run;
