//! # Worker Pool
//!
//! Bounded executor for vendor fetches and background persistence.
//!
//! The pool is constructed once, injected wherever work is submitted and
//! shut down at process exit. It never resizes.
//!
//! ## Admission
//!
//! - At most `max_workers` tasks run at once (semaphore permits).
//! - Up to `queue_capacity` more may wait for a permit.
//! - Beyond `max_workers + queue_capacity` submitted work runs on the
//!   caller instead of being rejected.
//! - Fire-and-forget work past that limit is still detached onto the
//!   runtime, so a saturated pool never holds a caller on a background write.
//!
//! `core_workers` does not limit anything here; it sizes the tokio runtime
//! the pool spawns onto.
//!
//! # Examples
//!
//! ```ignore
//! use pricehawk::application::services::worker_pool::{WorkerPool, WorkerPoolConfig};
//!
//! let pool = WorkerPool::new(WorkerPoolConfig::default())?;
//! let value = pool.submit(async { 21 * 2 })?.await?;
//! assert_eq!(value, 42);
//! ```

use futures::FutureExt;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::task::{Context, Poll};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{Notify, Semaphore};
use tokio::task::{AbortHandle, JoinError, JoinHandle};
use tracing::{debug, info, warn};

/// Default runtime worker threads.
pub const DEFAULT_CORE_WORKERS: usize = 10;

/// Default concurrent task limit.
pub const DEFAULT_MAX_WORKERS: usize = 40;

/// Default number of tasks allowed to wait for a worker.
pub const DEFAULT_QUEUE_CAPACITY: usize = 200;

/// Worker pool sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerPoolConfig {
    /// Runtime worker threads.
    pub core_workers: usize,
    /// Maximum concurrently running tasks.
    pub max_workers: usize,
    /// Maximum tasks waiting for a worker.
    pub queue_capacity: usize,
}

impl Default for WorkerPoolConfig {
    fn default() -> Self {
        Self {
            core_workers: DEFAULT_CORE_WORKERS,
            max_workers: DEFAULT_MAX_WORKERS,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl WorkerPoolConfig {
    /// Creates a configuration.
    #[must_use]
    pub fn new(core_workers: usize, max_workers: usize, queue_capacity: usize) -> Self {
        Self {
            core_workers,
            max_workers,
            queue_capacity,
        }
    }

    /// Total tasks admitted before caller-runs kicks in.
    #[must_use]
    pub fn admission_limit(&self) -> usize {
        self.max_workers.saturating_add(self.queue_capacity)
    }

    /// Checks the sizing.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidConfig`] when `max_workers` or
    /// `core_workers` is zero, or when `core_workers` exceeds `max_workers`.
    pub fn validate(&self) -> PoolResult<()> {
        if self.max_workers == 0 {
            return Err(PoolError::invalid_config(
                "worker_pool.max_workers must be positive",
            ));
        }
        if self.core_workers == 0 {
            return Err(PoolError::invalid_config(
                "worker_pool.core_workers must be positive",
            ));
        }
        if self.core_workers > self.max_workers {
            return Err(PoolError::invalid_config(format!(
                "worker_pool.core_workers ({}) exceeds max_workers ({})",
                self.core_workers, self.max_workers
            )));
        }
        Ok(())
    }
}

/// Error type for pool operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    /// The pool no longer accepts or runs work.
    #[error("worker pool is shut down")]
    ShutDown,

    /// The task panicked.
    #[error("task panicked: {0}")]
    Panicked(String),

    /// The task was cancelled before completing.
    #[error("task cancelled")]
    Cancelled,

    /// The pool sizing is unusable.
    #[error("invalid worker pool configuration: {0}")]
    InvalidConfig(String),
}

impl PoolError {
    /// Creates an invalid configuration error.
    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}

impl From<JoinError> for PoolError {
    fn from(error: JoinError) -> Self {
        if error.is_panic() {
            Self::Panicked(error.to_string())
        } else {
            Self::Cancelled
        }
    }
}

/// Result type for pool operations.
pub type PoolResult<T> = Result<T, PoolError>;

/// Handle to submitted work.
///
/// Resolves to the task output. Dropping the handle detaches the task.
#[derive(Debug)]
pub enum PoolTask<T> {
    /// Running (or queued) on the pool.
    Spawned(JoinHandle<Option<T>>),
    /// Saturated pool: runs on the task awaiting this handle.
    Inline(InlineTask<T>),
}

/// Work deferred to the caller.
pub struct InlineTask<T>(BoxFuture<'static, PoolResult<T>>);

impl<T> std::fmt::Debug for InlineTask<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("InlineTask")
    }
}

impl<T> PoolTask<T> {
    /// Returns true if the work was deferred to the caller.
    #[must_use]
    pub fn is_inline(&self) -> bool {
        matches!(self, Self::Inline(_))
    }

    /// Returns an abort handle for spawned work.
    ///
    /// Inline work has none; it stops when the handle is dropped.
    #[must_use]
    pub fn abort_handle(&self) -> Option<AbortHandle> {
        match self {
            Self::Spawned(handle) => Some(handle.abort_handle()),
            Self::Inline(_) => None,
        }
    }
}

impl<T> Future for PoolTask<T> {
    type Output = PoolResult<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match self.get_mut() {
            Self::Spawned(handle) => Pin::new(handle).poll(cx).map(|joined| match joined {
                Ok(Some(value)) => Ok(value),
                Ok(None) => Err(PoolError::ShutDown),
                Err(e) => Err(PoolError::from(e)),
            }),
            Self::Inline(task) => task.0.as_mut().poll(cx),
        }
    }
}

#[derive(Debug)]
struct Inner {
    config: WorkerPoolConfig,
    permits: Arc<Semaphore>,
    in_flight: AtomicUsize,
    caller_runs: AtomicU64,
    overflowed: AtomicU64,
    shut_down: AtomicBool,
    idle: Notify,
}

/// Decrements the in-flight count when a spawned task ends, even by panic.
struct InFlightGuard(Arc<Inner>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if self.0.in_flight.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.0.idle.notify_waiters();
        }
    }
}

/// Bounded worker pool with caller-runs saturation.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    inner: Arc<Inner>,
}

impl WorkerPool {
    /// Creates a pool.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidConfig`] if the sizing is invalid.
    pub fn new(config: WorkerPoolConfig) -> PoolResult<Self> {
        config.validate()?;
        Ok(Self {
            inner: Arc::new(Inner {
                config,
                permits: Arc::new(Semaphore::new(config.max_workers)),
                in_flight: AtomicUsize::new(0),
                caller_runs: AtomicU64::new(0),
                overflowed: AtomicU64::new(0),
                shut_down: AtomicBool::new(false),
                idle: Notify::new(),
            }),
        })
    }

    /// Returns the pool configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &WorkerPoolConfig {
        &self.inner.config
    }

    /// Running plus queued tasks.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.inner.in_flight.load(Ordering::Acquire)
    }

    /// Number of submissions that ran on the caller.
    #[must_use]
    pub fn caller_runs(&self) -> u64 {
        self.inner.caller_runs.load(Ordering::Relaxed)
    }

    /// Number of background tasks detached past the admission limit.
    #[must_use]
    pub fn overflowed(&self) -> u64 {
        self.inner.overflowed.load(Ordering::Relaxed)
    }

    /// Returns true once [`WorkerPool::shutdown`] has been called.
    #[must_use]
    pub fn is_shut_down(&self) -> bool {
        self.inner.shut_down.load(Ordering::Acquire)
    }

    /// Reserves an admission slot, or returns false when saturated.
    fn try_admit(&self) -> bool {
        let limit = self.inner.config.admission_limit();
        self.inner
            .in_flight
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < limit).then_some(n + 1)
            })
            .is_ok()
    }

    fn spawn_admitted<F>(&self, future: F) -> JoinHandle<Option<F::Output>>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let guard = InFlightGuard(Arc::clone(&self.inner));
        let permits = Arc::clone(&self.inner.permits);
        tokio::spawn(async move {
            let _guard = guard;
            let _permit = permits.acquire_owned().await.ok()?;
            Some(future.await)
        })
    }

    /// Submits work and returns a handle to its output.
    ///
    /// When the pool is saturated the returned handle runs the work itself
    /// when polled; panics are still caught and reported.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::ShutDown`] after shutdown.
    pub fn submit<F>(&self, future: F) -> PoolResult<PoolTask<F::Output>>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        if self.is_shut_down() {
            return Err(PoolError::ShutDown);
        }
        if self.try_admit() {
            return Ok(PoolTask::Spawned(self.spawn_admitted(future)));
        }

        self.inner.caller_runs.fetch_add(1, Ordering::Relaxed);
        warn!(
            in_flight = self.in_flight(),
            "worker pool saturated; running on caller"
        );
        let inline = AssertUnwindSafe(future)
            .catch_unwind()
            .map(|r| r.map_err(|_| PoolError::Panicked("inline task panicked".to_string())));
        Ok(PoolTask::Inline(InlineTask(inline.boxed())))
    }

    /// Runs work without waiting for its output.
    ///
    /// Returns as soon as the work is handed off. Past the admission limit
    /// the work is still detached and counted in [`WorkerPool::overflowed`];
    /// it waits for a permit like queued work and is tracked by
    /// [`WorkerPool::wait_idle`] and [`WorkerPool::shutdown`]. Panics are
    /// logged.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::ShutDown`] after shutdown.
    pub fn execute<F>(&self, future: F) -> PoolResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if self.is_shut_down() {
            return Err(PoolError::ShutDown);
        }
        if !self.try_admit() {
            self.inner.in_flight.fetch_add(1, Ordering::AcqRel);
            self.inner.overflowed.fetch_add(1, Ordering::Relaxed);
            warn!(
                in_flight = self.in_flight(),
                "worker pool saturated; detaching background work past the queue"
            );
        }

        let _detached = self.spawn_admitted(async move {
            if AssertUnwindSafe(future).catch_unwind().await.is_err() {
                warn!("background task panicked");
            }
        });
        Ok(())
    }

    /// Waits until no spawned task is running or queued.
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.inner.idle.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if self.in_flight() == 0 {
                return;
            }
            notified.await;
        }
    }

    /// Stops accepting work and waits up to `grace` for running tasks.
    ///
    /// Queued tasks that have not started are dropped. Returns true if the
    /// pool drained within the grace period.
    pub async fn shutdown(&self, grace: Duration) -> bool {
        if self.inner.shut_down.swap(true, Ordering::AcqRel) {
            debug!("worker pool already shut down");
        }
        self.inner.permits.close();

        let drained = tokio::time::timeout(grace, self.wait_idle()).await.is_ok();
        if drained {
            info!("worker pool drained");
        } else {
            warn!(
                in_flight = self.in_flight(),
                grace_ms = grace.as_millis() as u64,
                "worker pool shutdown grace period elapsed"
            );
        }
        drained
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use tokio::sync::oneshot;

    fn pool(max: usize, queue: usize) -> WorkerPool {
        WorkerPool::new(WorkerPoolConfig::new(1, max, queue)).unwrap()
    }

    #[test]
    fn default_sizing() {
        let config = WorkerPoolConfig::default();
        assert_eq!(config.core_workers, 10);
        assert_eq!(config.max_workers, 40);
        assert_eq!(config.queue_capacity, 200);
        assert_eq!(config.admission_limit(), 240);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn invalid_sizing_rejected() {
        assert!(WorkerPoolConfig::new(1, 0, 10).validate().is_err());
        assert!(WorkerPoolConfig::new(0, 4, 10).validate().is_err());
        assert!(WorkerPoolConfig::new(8, 4, 10).validate().is_err());
        assert!(matches!(
            WorkerPool::new(WorkerPoolConfig::new(8, 4, 0)),
            Err(PoolError::InvalidConfig(_))
        ));
        let err = WorkerPoolConfig::new(1, 0, 10).validate().unwrap_err();
        assert!(err.to_string().contains("max_workers"));
    }

    #[tokio::test]
    async fn submit_returns_output() {
        let pool = pool(2, 2);
        let task = pool.submit(async { 21 * 2 }).unwrap();
        assert!(!task.is_inline());
        assert_eq!(task.await.unwrap(), 42);
    }

    #[tokio::test]
    async fn panics_are_reported_not_propagated() {
        let pool = pool(2, 2);
        let task = pool.submit(async { panic!("boom") }).unwrap();
        let result: PoolResult<()> = task.await;
        assert!(matches!(result, Err(PoolError::Panicked(_))));
        pool.wait_idle().await;
        assert_eq!(pool.in_flight(), 0);
    }

    #[tokio::test]
    async fn saturation_runs_on_caller() {
        let pool = pool(1, 1);
        let (release_tx, release_rx) = oneshot::channel::<()>();
        let blocker = pool
            .submit(async move {
                let _ = release_rx.await;
            })
            .unwrap();
        let queued = pool.submit(async { 1 }).unwrap();
        assert_eq!(pool.in_flight(), 2);

        let overflow = pool.submit(async { 7 }).unwrap();
        assert!(overflow.is_inline());
        assert_eq!(overflow.await.unwrap(), 7);
        assert_eq!(pool.caller_runs(), 1);

        release_tx.send(()).unwrap();
        blocker.await.unwrap();
        assert_eq!(queued.await.unwrap(), 1);
    }

    #[tokio::test]
    async fn inline_panic_is_caught() {
        let pool = pool(1, 0);
        let (_hold_tx, hold_rx) = oneshot::channel::<()>();
        let _blocker = pool
            .submit(async move {
                let _ = hold_rx.await;
            })
            .unwrap();
        let overflow = pool.submit(async { panic!("inline boom") }).unwrap();
        let result: PoolResult<()> = overflow.await;
        assert!(matches!(result, Err(PoolError::Panicked(_))));
    }

    #[tokio::test]
    async fn execute_is_fire_and_forget() {
        let pool = pool(2, 2);
        let (tx, rx) = oneshot::channel();
        pool.execute(async move {
            let _ = tx.send(5);
        })
        .unwrap();
        assert_eq!(rx.await.unwrap(), 5);
        pool.wait_idle().await;
        assert_eq!(pool.overflowed(), 0);
    }

    #[tokio::test]
    async fn saturated_execute_detaches_instead_of_blocking() {
        let pool = pool(1, 0);
        let (release_tx, release_rx) = oneshot::channel::<()>();
        let blocker = pool
            .submit(async move {
                let _ = release_rx.await;
            })
            .unwrap();

        let (done_tx, done_rx) = oneshot::channel();
        pool.execute(async move {
            let _ = done_tx.send("written");
        })
        .unwrap();
        assert_eq!(pool.overflowed(), 1);
        assert_eq!(pool.caller_runs(), 0);
        assert_eq!(pool.in_flight(), 2);

        release_tx.send(()).unwrap();
        blocker.await.unwrap();
        assert_eq!(done_rx.await.unwrap(), "written");
        pool.wait_idle().await;
        assert_eq!(pool.in_flight(), 0);
    }

    #[tokio::test]
    async fn execute_logs_panics_and_stays_usable() {
        let pool = pool(1, 0);
        pool.execute(async { panic!("write failed") }).unwrap();
        pool.wait_idle().await;
        assert_eq!(pool.in_flight(), 0);
        assert_eq!(pool.submit(async { 3 }).unwrap().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn shutdown_rejects_new_work() {
        let pool = pool(2, 2);
        assert!(pool.shutdown(Duration::from_millis(50)).await);
        assert!(pool.is_shut_down());
        assert!(matches!(pool.submit(async {}), Err(PoolError::ShutDown)));
        assert!(matches!(pool.execute(async {}), Err(PoolError::ShutDown)));
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_reports_unfinished_work() {
        let pool = pool(1, 0);
        let (started_tx, started_rx) = oneshot::channel();
        let _task = pool
            .submit(async move {
                let _ = started_tx.send(());
                tokio::time::sleep(Duration::from_secs(60)).await;
            })
            .unwrap();
        started_rx.await.unwrap();
        assert!(!pool.shutdown(Duration::from_secs(1)).await);
    }
}
