//! Worker Pool
//!
//! A fixed set of OS threads pulling job identifiers from a [`JobQueue`],
//! executing the workload, and recording one [`Outcome`] per job. A workload
//! failure affects only that invocation; the worker and the rest of the pool
//! keep going. Workers terminate when the queue hands them `None`.

use crate::outcome::{Outcome, ResultStore};
use crate::queue::JobQueue;
use crate::runner::Checkpoint;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;
use thiserror::Error;
use tracing::debug;

/// The caller-supplied workload.
///
/// The return value's error is the only signal distinguishing Failure from
/// Success. A panicking workload is also captured as a Failure rather than
/// tearing down the worker.
pub type Workload =
    Arc<dyn Fn() -> Result<(), Box<dyn std::error::Error + Send + Sync>> + Send + Sync>;

/// Purely observational progress sink, called once per processed job.
pub type ProgressFn = Arc<dyn Fn() + Send + Sync>;

/// Wrap a closure as a [`Workload`].
pub fn workload<F>(f: F) -> Workload
where
    F: Fn() -> Result<(), Box<dyn std::error::Error + Send + Sync>> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Errors from spawning or joining pool workers.
#[derive(Debug, Error)]
pub enum PoolError {
    /// The OS refused to spawn a worker thread.
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),

    /// A worker thread itself panicked (workload panics are captured and do
    /// not cause this).
    #[error("worker thread panicked: {0}")]
    WorkerPanicked(String),
}

/// Everything a worker needs: shared queue, store, timing origin, workload,
/// and the optional progress and checkpoint hooks.
pub struct WorkerContext {
    pub(crate) queue: Arc<JobQueue>,
    pub(crate) store: Arc<ResultStore>,
    pub(crate) run_start: Instant,
    pub(crate) workload: Workload,
    pub(crate) progress: Option<ProgressFn>,
    pub(crate) checkpoint: Option<Arc<Checkpoint>>,
}

impl WorkerContext {
    /// Create a context with no progress or checkpoint hooks.
    pub fn new(
        queue: Arc<JobQueue>,
        store: Arc<ResultStore>,
        run_start: Instant,
        workload: Workload,
    ) -> Self {
        Self {
            queue,
            store,
            run_start,
            workload,
            progress: None,
            checkpoint: None,
        }
    }

    /// Attach a progress sink.
    pub fn with_progress(mut self, progress: ProgressFn) -> Self {
        self.progress = Some(progress);
        self
    }

    pub(crate) fn with_checkpoint(mut self, checkpoint: Arc<Checkpoint>) -> Self {
        self.checkpoint = Some(checkpoint);
        self
    }
}

/// Handle over the spawned workers.
pub struct WorkerPool {
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Launch `pool_size` workers bound to the given context.
    ///
    /// Surplus workers (more workers than jobs) see an empty queue
    /// immediately and exit with zero work done.
    pub fn start(pool_size: usize, ctx: WorkerContext) -> Result<Self, PoolError> {
        let ctx = Arc::new(ctx);
        let mut handles = Vec::with_capacity(pool_size);

        for index in 0..pool_size {
            let ctx = Arc::clone(&ctx);
            let handle = std::thread::Builder::new()
                .name(format!("loadwave-worker-{index}"))
                .spawn(move || worker_loop(&ctx))?;
            handles.push(handle);
        }

        Ok(Self { handles })
    }

    /// Block until every worker has terminated.
    pub fn join(self) -> Result<(), PoolError> {
        for handle in self.handles {
            handle
                .join()
                .map_err(|panic| PoolError::WorkerPanicked(panic_message(panic)))?;
        }
        Ok(())
    }
}

fn worker_loop(ctx: &WorkerContext) {
    while let Some(job) = ctx.queue.take() {
        // Bucket by elapsed whole seconds at the moment the job starts.
        let bucket = ctx.run_start.elapsed().as_secs();

        let job_start = Instant::now();
        let result = panic::catch_unwind(AssertUnwindSafe(|| (ctx.workload)()));
        let duration = job_start.elapsed();

        let outcome = match result {
            Ok(Ok(())) => Outcome::success(duration),
            Ok(Err(error)) => Outcome::failure(duration, error.to_string()),
            Err(panic) => Outcome::failure(duration, panic_message(panic)),
        };
        ctx.store.append(bucket, outcome);

        if let Some(progress) = &ctx.progress {
            progress();
        }

        if let Some(checkpoint) = &ctx.checkpoint {
            if checkpoint.should_fire(job) {
                // Runs synchronously on this worker; the next take() waits
                // until rendering and uploading are done.
                checkpoint.fire(&ctx.store);
            }
        }
    }
    debug!("worker drained queue, exiting");
}

/// Extract a human-readable message from a caught panic payload.
pub(crate) fn panic_message(panic: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::Duration;

    fn context(total: u64, workload: Workload) -> WorkerContext {
        WorkerContext::new(
            Arc::new(JobQueue::new(total)),
            Arc::new(ResultStore::new()),
            Instant::now(),
            workload,
        )
    }

    #[test]
    fn test_all_jobs_processed_exactly_once() {
        let ctx = context(50, workload(|| Ok(())));
        let store = Arc::clone(&ctx.store);

        let pool = WorkerPool::start(4, ctx).unwrap();
        pool.join().unwrap();

        assert_eq!(store.total_recorded(), 50);
        assert!(store.all_outcomes().iter().all(|o| o.pass));
    }

    #[test]
    fn test_pool_larger_than_jobs() {
        // Surplus workers must exit immediately without error
        let ctx = context(5, workload(|| Ok(())));
        let store = Arc::clone(&ctx.store);

        let pool = WorkerPool::start(10, ctx).unwrap();
        pool.join().unwrap();

        assert_eq!(store.total_recorded(), 5);
    }

    #[test]
    fn test_workload_error_recorded_not_fatal() {
        let ctx = context(20, workload(|| Err("connection refused".into())));
        let store = Arc::clone(&ctx.store);

        let pool = WorkerPool::start(5, ctx).unwrap();
        pool.join().unwrap();

        let outcomes = store.all_outcomes();
        assert_eq!(outcomes.len(), 20);
        assert!(outcomes.iter().all(|o| !o.pass));
        assert!(outcomes
            .iter()
            .all(|o| o.error.as_deref() == Some("connection refused")));
    }

    #[test]
    fn test_workload_panic_captured_as_failure() {
        let ctx = context(8, workload(|| panic!("boom")));
        let store = Arc::clone(&ctx.store);

        let pool = WorkerPool::start(2, ctx).unwrap();
        pool.join().unwrap();

        let outcomes = store.all_outcomes();
        assert_eq!(outcomes.len(), 8);
        assert!(outcomes.iter().all(|o| !o.pass));
        assert!(outcomes.iter().all(|o| o.error.as_deref() == Some("boom")));
    }

    #[test]
    fn test_progress_called_once_per_job() {
        let counter = Arc::new(AtomicU64::new(0));
        let seen = Arc::clone(&counter);

        let ctx = context(30, workload(|| Ok(())))
            .with_progress(Arc::new(move || {
                seen.fetch_add(1, Ordering::SeqCst);
            }));

        let pool = WorkerPool::start(3, ctx).unwrap();
        pool.join().unwrap();

        assert_eq!(counter.load(Ordering::SeqCst), 30);
    }

    #[test]
    fn test_failure_duration_is_measured() {
        let ctx = context(1, workload(|| {
            std::thread::sleep(Duration::from_millis(20));
            Err("late".into())
        }));
        let store = Arc::clone(&ctx.store);

        let pool = WorkerPool::start(1, ctx).unwrap();
        pool.join().unwrap();

        let outcomes = store.all_outcomes();
        assert!(outcomes[0].duration >= Duration::from_millis(20));
    }
}
