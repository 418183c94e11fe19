use std::sync::Arc;
use std::time::Duration;

use log::warn;

use crate::config::ThreadConfig;
use crate::error::PoolError;
use crate::monitor::Monitor;
use crate::worker::spawn_worker;
use crate::Result;

/// A bounded, dynamically-sized worker thread pool.
///
/// The pool starts with zero threads and grows on demand, one worker per
/// submission, up to `max_workers`. Workers that sit idle longer than the
/// idle timeout exit on their own, but never below `min_workers`. Jobs are
/// executed in FIFO submission order; completions are concurrent and
/// unordered.
///
/// Dropping the pool (or calling [`shutdown`](ThreadPool::shutdown))
/// discards all queued jobs, lets in-flight jobs finish, and blocks until
/// every worker has exited.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use dynpool::{ThreadConfig, ThreadPool};
///
/// let pool = ThreadPool::new(1, 4, Some(Duration::from_secs(30)), ThreadConfig::default())?;
/// pool.spawn(|| println!("hello from a worker"));
/// pool.join();
/// # Ok::<(), dynpool::PoolError>(())
/// ```
pub struct ThreadPool {
    monitor: Arc<Monitor>,
}

impl ThreadPool {
    /// Creates a pool bounded by `min_workers` and `max_workers`.
    ///
    /// No threads are spawned up front; the first submission creates the
    /// first worker. An `idle_timeout` of `None` means idle workers never
    /// self-terminate.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidConfiguration`] if
    /// `min_workers > max_workers` or `max_workers` is zero.
    pub fn new(
        min_workers: usize,
        max_workers: usize,
        idle_timeout: Option<Duration>,
        thread_config: ThreadConfig,
    ) -> Result<Self> {
        if min_workers > max_workers || max_workers == 0 {
            return Err(PoolError::InvalidConfiguration {
                min: min_workers,
                max: max_workers,
            });
        }

        Ok(ThreadPool {
            monitor: Arc::new(Monitor::new(
                min_workers,
                max_workers,
                idle_timeout,
                thread_config,
            )),
        })
    }

    /// Creates a pool with a floor of one worker and a ceiling of one
    /// worker per logical CPU, with no idle timeout.
    pub fn with_default_size() -> Result<Self> {
        Self::new(1, num_cpus::get(), None, ThreadConfig::default())
    }

    /// Submits a job to the pool.
    ///
    /// The job is appended to the queue; if a worker is idle it is woken,
    /// otherwise a new worker is spawned unless the pool is already at its
    /// ceiling. Returns as soon as the job is queued — it does not wait
    /// for execution. A failure to spawn a worker is logged and the job
    /// stays queued for the next worker that frees up.
    pub fn spawn<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let mut state = self.monitor.lock();
        state.queue.push_back(Box::new(job));

        if state.idle > 0 {
            // Broadcast rather than signal: several jobs may have queued
            // since the last wakeup, and a woken worker that finds the
            // queue already empty simply resumes waiting.
            self.monitor.job_available.notify_all();
        } else if state.nthreads < self.monitor.max_workers {
            if let Err(e) = spawn_worker(&self.monitor, &mut state) {
                warn!("failed to grow pool: {e}");
            }
        }
    }

    /// Blocks until the pool is drained: no queued jobs and no worker
    /// executing one.
    ///
    /// This is a quiescence barrier, not a snapshot — a submission racing
    /// with this call may extend the wait. Returns immediately if the pool
    /// is already drained; concurrent callers are all released by the same
    /// broadcast.
    pub fn join(&self) {
        let mut state = self.monitor.lock();
        while !state.is_drained() {
            // Re-armed on every iteration: the draining worker clears the
            // flag when it broadcasts, and the pool may have picked up new
            // work before this thread reacquired the lock.
            state.wait_requested = true;
            state = self
                .monitor
                .drained
                .wait(state)
                .expect("pool state lock poisoned");
        }
        state.wait_requested = false;
    }

    /// Shuts the pool down, consuming it.
    ///
    /// Queued jobs that have not started are discarded. Jobs already
    /// running are left to finish; shutdown blocks until every worker has
    /// exited. Equivalent to dropping the pool, spelled out for callers
    /// that want the teardown point visible.
    pub fn shutdown(self) {
        drop(self);
    }

    /// Number of live worker threads.
    pub fn thread_count(&self) -> usize {
        self.monitor.lock().nthreads
    }

    /// Number of workers blocked waiting for a job.
    pub fn idle_count(&self) -> usize {
        self.monitor.lock().idle
    }

    /// Number of workers currently executing a job.
    pub fn active_count(&self) -> usize {
        self.monitor.lock().active.len()
    }

    /// Number of jobs queued but not yet started.
    pub fn queued_count(&self) -> usize {
        self.monitor.lock().queue.len()
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        let mut state = self.monitor.lock();
        state.destroying = true;
        state.queue.clear();
        self.monitor.job_available.notify_all();
        while state.nthreads > 0 {
            state = self
                .monitor
                .all_exited
                .wait(state)
                .expect("pool state lock poisoned");
        }
    }
}

impl std::fmt::Debug for ThreadPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.monitor.lock();
        f.debug_struct("ThreadPool")
            .field("min_workers", &self.monitor.min_workers)
            .field("max_workers", &self.monitor.max_workers)
            .field("nthreads", &state.nthreads)
            .field("idle", &state.idle)
            .field("active", &state.active.len())
            .field("queued", &state.queue.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_pool(min: usize, max: usize) -> Result<ThreadPool> {
        ThreadPool::new(min, max, None, ThreadConfig::default())
    }

    #[test]
    fn create_starts_with_no_workers() {
        let pool = default_pool(2, 4).unwrap();
        assert_eq!(pool.thread_count(), 0);
        assert_eq!(pool.idle_count(), 0);
        assert_eq!(pool.active_count(), 0);
        assert_eq!(pool.queued_count(), 0);
    }

    #[test]
    fn create_rejects_min_above_max() {
        match default_pool(4, 2) {
            Err(PoolError::InvalidConfiguration { min, max }) => {
                assert_eq!(min, 4);
                assert_eq!(max, 2);
            }
            other => panic!("expected InvalidConfiguration, got {other:?}"),
        }
    }

    #[test]
    fn create_rejects_zero_max() {
        assert!(matches!(
            default_pool(0, 0),
            Err(PoolError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn zero_floor_is_valid() {
        let pool = default_pool(0, 1).unwrap();
        assert_eq!(pool.thread_count(), 0);
    }

    #[test]
    fn with_default_size_is_cpu_bounded() {
        let pool = ThreadPool::with_default_size().unwrap();
        assert_eq!(pool.thread_count(), 0);
        pool.spawn(|| {});
        pool.join();
        assert!(pool.thread_count() <= num_cpus::get());
    }
}
