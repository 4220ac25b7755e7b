//! Run Orchestration
//!
//! [`LoadTest`] owns the run configuration, drives the queue and worker
//! pool, exposes derived summary statistics, and assembles the checkpoint
//! that workers fire as they cross an export boundary.
//!
//! ## Pipeline
//!
//! ```text
//! RunConfig (validated at construction)
//!       │
//!       ▼
//! ┌────────────┐    ┌────────────┐
//! │  JobQueue  │───▶│ WorkerPool │  take → execute → record → progress
//! └────────────┘    └─────┬──────┘
//!                         │ job id % pool_size == 0, or final id
//!                         ▼
//!                   ┌────────────┐
//!                   │ Checkpoint │  render snapshot, optionally upload
//!                   └────────────┘
//! ```

use crate::export::{ArtifactUploader, ReportOptions, ReportSink};
use crate::outcome::ResultStore;
use crate::pool::{PoolError, ProgressFn, WorkerContext, WorkerPool, Workload};
use crate::queue::JobQueue;
use crate::stats::{compute_stats, RunStats};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tracing::{info, warn};

/// Immutable per-run configuration.
///
/// All fields are optional at the surface (CLI/TOML); defaults are applied
/// before the struct is built. Invalid values are rejected by
/// [`RunConfig::validate`] before any worker starts.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// Number of workload invocations to perform.
    pub total_jobs: u64,
    /// Number of concurrent workers.
    pub pool_size: usize,
    /// Whether to export a checkpoint report during the run.
    pub output: bool,
    /// Base name of the report artifact, without extension.
    pub file_name: String,
    /// Report headline.
    pub header: String,
    /// Free-form description shown under the headline.
    pub description: String,
    /// Remote storage bucket for checkpoint artifacts.
    pub upload_bucket: Option<String>,
    /// Region of the remote storage bucket.
    pub upload_region: Option<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            total_jobs: 1000,
            pool_size: 100,
            output: false,
            file_name: "load_test".to_string(),
            header: String::new(),
            description: String::new(),
            upload_bucket: None,
            upload_region: None,
        }
    }
}

impl RunConfig {
    /// Reject configurations that must fail fast, before any worker starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.total_jobs == 0 {
            return Err(ConfigError::ZeroJobs);
        }
        if self.pool_size == 0 {
            return Err(ConfigError::ZeroPoolSize);
        }
        if self.upload_bucket.is_some() && self.upload_region.is_none() {
            return Err(ConfigError::MissingUploadRegion);
        }
        Ok(())
    }
}

/// Configuration rejected before the run started.
///
/// Distinct from a workload failure: nothing has executed yet.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// `total_jobs` must be positive.
    #[error("total_jobs must be positive")]
    ZeroJobs,

    /// `pool_size` must be positive.
    #[error("pool_size must be positive")]
    ZeroPoolSize,

    /// An upload bucket was configured without a region.
    #[error("upload_bucket is configured but upload_region is missing")]
    MissingUploadRegion,
}

/// Error from driving a run.
#[derive(Debug, Error)]
pub enum RunError {
    /// `run` was called on a test that already ran (or is running).
    #[error("load test has already been run")]
    AlreadyRun,

    /// The worker pool failed to start or join.
    #[error(transparent)]
    Pool(#[from] PoolError),
}

/// Lifecycle of a [`LoadTest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RunPhase {
    /// `run` has not been called.
    NotStarted = 0,
    /// Workers are executing.
    Running = 1,
    /// `run` has exited, by any path.
    Completed = 2,
}

impl RunPhase {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => RunPhase::NotStarted,
            1 => RunPhase::Running,
            _ => RunPhase::Completed,
        }
    }
}

/// Marks the run completed when dropped, so the transition happens exactly
/// once on every exit path of `run`, including faults in the driver itself.
struct CompletionGuard<'a> {
    phase: &'a AtomicU8,
}

impl Drop for CompletionGuard<'_> {
    fn drop(&mut self) {
        self.phase.store(RunPhase::Completed as u8, Ordering::SeqCst);
    }
}

/// Checkpoint fired by whichever worker crosses an export boundary.
///
/// Rendering and uploading run synchronously on that worker thread, delaying
/// its next `take()`; failures are logged and never kill the worker.
pub(crate) struct Checkpoint {
    sink: Arc<dyn ReportSink>,
    uploader: Option<Arc<dyn ArtifactUploader>>,
    options: ReportOptions,
    pool_size: u64,
    last_job: u64,
    destination_key: String,
}

impl Checkpoint {
    /// Trigger semantics follow the job identifier, not the count of jobs
    /// completed so far: a boundary is the job whose id is a multiple of the
    /// pool size, plus the final id.
    pub(crate) fn should_fire(&self, job: u64) -> bool {
        job % self.pool_size == 0 || job == self.last_job
    }

    pub(crate) fn fire(&self, store: &ResultStore) {
        let snapshot = store.snapshot();
        let artifact = match self.sink.render(&snapshot, &self.options) {
            Ok(path) => path,
            Err(error) => {
                warn!(error = %error, "checkpoint report render failed");
                return;
            }
        };
        if let Some(uploader) = &self.uploader {
            if let Err(error) = uploader.upload(&artifact, &self.destination_key) {
                warn!(error = %error, key = %self.destination_key, "checkpoint upload failed");
            }
        }
    }
}

/// Orchestrator for one load-test run.
///
/// Construct with a validated [`RunConfig`], wire the optional collaborators
/// (report sink, uploader, progress sink), then call [`LoadTest::run`] with
/// the workload. The caller blocks until every worker has joined. Results
/// stay readable after completion for final reporting.
pub struct LoadTest {
    config: RunConfig,
    store: Arc<ResultStore>,
    phase: AtomicU8,
    report_sink: Option<Arc<dyn ReportSink>>,
    uploader: Option<Arc<dyn ArtifactUploader>>,
    progress: Option<ProgressFn>,
}

impl LoadTest {
    /// Create a load test, rejecting invalid configuration up front.
    pub fn new(config: RunConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            store: Arc::new(ResultStore::new()),
            phase: AtomicU8::new(RunPhase::NotStarted as u8),
            report_sink: None,
            uploader: None,
            progress: None,
        })
    }

    /// Attach the sink that renders checkpoint reports.
    ///
    /// Checkpoints fire only when the configuration enables `output` and a
    /// sink is attached.
    pub fn with_report_sink(mut self, sink: Arc<dyn ReportSink>) -> Self {
        self.report_sink = Some(sink);
        self
    }

    /// Attach the uploader for checkpoint artifacts.
    pub fn with_uploader(mut self, uploader: Arc<dyn ArtifactUploader>) -> Self {
        self.uploader = Some(uploader);
        self
    }

    /// Attach a progress sink, called once per completed job.
    pub fn with_progress(mut self, progress: ProgressFn) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Execute the run: build the queue, start the pool, join, summarize.
    ///
    /// Blocks until all workers have terminated. The completion phase is
    /// reached on every exit path.
    pub fn run(&self, workload: Workload) -> Result<RunStats, RunError> {
        if self
            .phase
            .compare_exchange(
                RunPhase::NotStarted as u8,
                RunPhase::Running as u8,
                Ordering::SeqCst,
                Ordering::SeqCst,
            )
            .is_err()
        {
            return Err(RunError::AlreadyRun);
        }
        let _guard = CompletionGuard { phase: &self.phase };

        info!(
            total_jobs = self.config.total_jobs,
            pool_size = self.config.pool_size,
            "starting load test"
        );

        let run_start = Instant::now();
        let started_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        let queue = Arc::new(JobQueue::new(self.config.total_jobs));
        let mut ctx = WorkerContext::new(queue, Arc::clone(&self.store), run_start, workload);
        if let Some(progress) = &self.progress {
            ctx = ctx.with_progress(Arc::clone(progress));
        }
        if let Some(checkpoint) = self.checkpoint(started_epoch) {
            ctx = ctx.with_checkpoint(Arc::new(checkpoint));
        }

        let pool = WorkerPool::start(self.config.pool_size, ctx)?;
        pool.join()?;

        let stats = compute_stats(&self.store.snapshot());
        info!(
            success = stats.success,
            errors = stats.errors,
            avg_ms = stats.avg_ms,
            "load test complete"
        );
        Ok(stats)
    }

    fn checkpoint(&self, started_epoch: u64) -> Option<Checkpoint> {
        if !self.config.output {
            return None;
        }
        let sink = self.report_sink.clone()?;
        Some(Checkpoint {
            sink,
            uploader: self.uploader.clone(),
            options: ReportOptions {
                file_name: self.config.file_name.clone(),
                header: self.config.header.clone(),
                description: self.config.description.clone(),
            },
            pool_size: self.config.pool_size as u64,
            last_job: self.config.total_jobs - 1,
            destination_key: format!("{}_{}.html", self.config.file_name, started_epoch),
        })
    }

    /// Number of checkpoint waves expected over the run:
    /// `ceil(total_jobs / pool_size)`.
    pub fn total_epochs(&self) -> u64 {
        let pool = self.config.pool_size as u64;
        self.config.total_jobs.div_ceil(pool)
    }

    /// Whether the run has completed, by any exit path.
    pub fn is_run(&self) -> bool {
        self.phase() == RunPhase::Completed
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> RunPhase {
        RunPhase::from_u8(self.phase.load(Ordering::SeqCst))
    }

    /// The result store backing this run.
    pub fn store(&self) -> &Arc<ResultStore> {
        &self.store
    }

    /// The configuration this run was built with.
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Summary statistics over whatever outcomes exist so far.
    pub fn stats(&self) -> RunStats {
        compute_stats(&self.store.snapshot())
    }

    /// Smallest recorded duration in milliseconds, 0 when no outcomes exist.
    pub fn min_time_ms(&self) -> f64 {
        self.stats().min_ms
    }

    /// Largest recorded duration in milliseconds, 0 when no outcomes exist.
    pub fn max_time_ms(&self) -> f64 {
        self.stats().max_ms
    }

    /// Mean duration in milliseconds, 0 (not NaN) when no outcomes exist.
    pub fn avg_time_ms(&self) -> f64 {
        self.stats().avg_ms
    }

    /// Count of successful invocations recorded so far.
    pub fn success_count(&self) -> u64 {
        self.stats().success
    }

    /// Count of failed invocations recorded so far.
    pub fn error_count(&self) -> u64 {
        self.stats().errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::CheckpointError;
    use crate::outcome::Buckets;
    use crate::pool::workload;
    use std::path::{Path, PathBuf};
    use std::sync::atomic::AtomicU64;

    fn config(total_jobs: u64, pool_size: usize) -> RunConfig {
        RunConfig {
            total_jobs,
            pool_size,
            ..RunConfig::default()
        }
    }

    #[test]
    fn test_rejects_zero_jobs() {
        let err = LoadTest::new(config(0, 10)).err().unwrap();
        assert_eq!(err, ConfigError::ZeroJobs);
    }

    #[test]
    fn test_rejects_zero_pool_size() {
        let err = LoadTest::new(config(10, 0)).err().unwrap();
        assert_eq!(err, ConfigError::ZeroPoolSize);
    }

    #[test]
    fn test_rejects_bucket_without_region() {
        let cfg = RunConfig {
            upload_bucket: Some("results".to_string()),
            ..RunConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::MissingUploadRegion));
    }

    #[test]
    fn test_total_epochs_rounds_up() {
        assert_eq!(LoadTest::new(config(1000, 100)).unwrap().total_epochs(), 10);
        assert_eq!(LoadTest::new(config(950, 100)).unwrap().total_epochs(), 10);
        assert_eq!(LoadTest::new(config(100, 100)).unwrap().total_epochs(), 1);
        assert_eq!(LoadTest::new(config(10, 2)).unwrap().total_epochs(), 5);
    }

    #[test]
    fn test_run_all_success() {
        let test = LoadTest::new(config(10, 2)).unwrap();
        let stats = test.run(workload(|| Ok(()))).unwrap();

        assert_eq!(stats.success, 10);
        assert_eq!(stats.errors, 0);
        assert!(test.is_run());
        assert_eq!(test.phase(), RunPhase::Completed);
    }

    #[test]
    fn test_run_all_failures() {
        let test = LoadTest::new(config(12, 3)).unwrap();
        let stats = test.run(workload(|| Err("down".into()))).unwrap();

        assert_eq!(stats.success, 0);
        assert_eq!(stats.errors, 12);
    }

    #[test]
    fn test_second_run_rejected_but_still_completed() {
        let test = LoadTest::new(config(4, 2)).unwrap();
        test.run(workload(|| Ok(()))).unwrap();

        let err = test.run(workload(|| Ok(()))).err().unwrap();
        assert!(matches!(err, RunError::AlreadyRun));
        assert!(test.is_run());
        // The failed second call must not wipe recorded results
        assert_eq!(test.success_count(), 4);
    }

    #[test]
    fn test_stats_before_run_are_zero() {
        let test = LoadTest::new(config(10, 2)).unwrap();
        assert_eq!(test.min_time_ms(), 0.0);
        assert_eq!(test.max_time_ms(), 0.0);
        assert_eq!(test.avg_time_ms(), 0.0);
        assert_eq!(test.phase(), RunPhase::NotStarted);
        assert!(!test.is_run());
    }

    struct CountingSink {
        renders: AtomicU64,
    }

    impl ReportSink for CountingSink {
        fn render(
            &self,
            _snapshot: &Buckets,
            _options: &ReportOptions,
        ) -> Result<PathBuf, CheckpointError> {
            self.renders.fetch_add(1, Ordering::SeqCst);
            Ok(PathBuf::from("counting-sink.html"))
        }
    }

    struct FailingSink;

    impl ReportSink for FailingSink {
        fn render(
            &self,
            _snapshot: &Buckets,
            _options: &ReportOptions,
        ) -> Result<PathBuf, CheckpointError> {
            Err("disk full".into())
        }
    }

    struct CountingUploader {
        uploads: AtomicU64,
    }

    impl ArtifactUploader for CountingUploader {
        fn upload(&self, _artifact: &Path, _key: &str) -> Result<(), CheckpointError> {
            self.uploads.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn test_checkpoint_fires_on_id_boundaries() {
        // Jobs 0..10 with pool 2: ids 0,2,4,6,8 are boundaries, plus the
        // final id 9 — six fires, independent of interleaving.
        let sink = Arc::new(CountingSink {
            renders: AtomicU64::new(0),
        });
        let cfg = RunConfig {
            output: true,
            ..config(10, 2)
        };
        let test = LoadTest::new(cfg).unwrap().with_report_sink(sink.clone());
        test.run(workload(|| Ok(()))).unwrap();

        assert_eq!(sink.renders.load(Ordering::SeqCst), 6);
    }

    #[test]
    fn test_checkpoint_skipped_when_output_disabled() {
        let sink = Arc::new(CountingSink {
            renders: AtomicU64::new(0),
        });
        let test = LoadTest::new(config(10, 2))
            .unwrap()
            .with_report_sink(sink.clone());
        test.run(workload(|| Ok(()))).unwrap();

        assert_eq!(sink.renders.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_render_failure_does_not_kill_workers() {
        let cfg = RunConfig {
            output: true,
            ..config(20, 4)
        };
        let test = LoadTest::new(cfg).unwrap().with_report_sink(Arc::new(FailingSink));
        let stats = test.run(workload(|| Ok(()))).unwrap();

        // Every job still processed despite every render failing
        assert_eq!(stats.total(), 20);
    }

    #[test]
    fn test_upload_follows_each_render() {
        let sink = Arc::new(CountingSink {
            renders: AtomicU64::new(0),
        });
        let uploader = Arc::new(CountingUploader {
            uploads: AtomicU64::new(0),
        });
        let cfg = RunConfig {
            output: true,
            upload_bucket: Some("results".to_string()),
            upload_region: Some("eu-west-1".to_string()),
            ..config(6, 3)
        };
        let test = LoadTest::new(cfg)
            .unwrap()
            .with_report_sink(sink.clone())
            .with_uploader(uploader.clone());
        test.run(workload(|| Ok(()))).unwrap();

        // Boundaries for 6 jobs, pool 3: ids 0, 3, and final id 5
        assert_eq!(sink.renders.load(Ordering::SeqCst), 3);
        assert_eq!(uploader.uploads.load(Ordering::SeqCst), 3);
    }
}
