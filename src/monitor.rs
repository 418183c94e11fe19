use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Condvar, Mutex, MutexGuard};
use std::time::Duration;

use crate::config::ThreadConfig;

/// A queued unit of work. Owned by the queue until a worker claims it,
/// then by that worker until the call returns.
pub(crate) type Job = Box<dyn FnOnce() + Send + 'static>;

/// Identifier of a live worker thread, the key into the active registry.
pub(crate) type WorkerId = usize;

/// Mutable pool state. Every field is read and written only while holding
/// the monitor's mutex.
pub(crate) struct PoolState {
    /// Pending jobs in submission order.
    pub(crate) queue: VecDeque<Job>,
    /// Workers currently executing a job.
    pub(crate) active: HashSet<WorkerId>,
    /// Live worker threads.
    pub(crate) nthreads: usize,
    /// Workers blocked waiting for a job.
    pub(crate) idle: usize,
    /// A caller is blocked in `join`.
    pub(crate) wait_requested: bool,
    /// Shutdown has begun; no worker may be created and no job dequeued.
    pub(crate) destroying: bool,
}

impl PoolState {
    /// True once no work is pending or in flight.
    ///
    /// Uses the active-set emptiness check rather than `idle == nthreads`:
    /// a freshly spawned worker is briefly neither idle nor active, so the
    /// counter identity does not hold at every observable point.
    pub(crate) fn is_drained(&self) -> bool {
        self.queue.is_empty() && self.active.is_empty()
    }
}

/// The pool monitor: one mutex over [`PoolState`] plus the three condition
/// variables coordinating producers, workers, and waiters.
pub(crate) struct Monitor {
    /// The pool never shrinks below this many workers on its own.
    pub(crate) min_workers: usize,
    /// The pool never grows beyond this many workers.
    pub(crate) max_workers: usize,
    /// How long an idle worker above the floor lingers before exiting.
    /// `None` means idle workers never self-terminate.
    pub(crate) idle_timeout: Option<Duration>,
    /// Applied to every worker thread spawned for this pool.
    pub(crate) thread_config: ThreadConfig,
    next_worker_id: AtomicUsize,
    state: Mutex<PoolState>,
    /// Wakes idle workers when a job is queued or shutdown begins.
    pub(crate) job_available: Condvar,
    /// Wakes callers blocked in `join` once the pool is drained.
    pub(crate) drained: Condvar,
    /// Wakes the caller tearing down the pool once the last worker exits.
    pub(crate) all_exited: Condvar,
}

impl Monitor {
    pub(crate) fn new(
        min_workers: usize,
        max_workers: usize,
        idle_timeout: Option<Duration>,
        thread_config: ThreadConfig,
    ) -> Self {
        Monitor {
            min_workers,
            max_workers,
            idle_timeout,
            thread_config,
            next_worker_id: AtomicUsize::new(0),
            state: Mutex::new(PoolState {
                queue: VecDeque::new(),
                active: HashSet::new(),
                nthreads: 0,
                idle: 0,
                wait_requested: false,
                destroying: false,
            }),
            job_available: Condvar::new(),
            drained: Condvar::new(),
            all_exited: Condvar::new(),
        }
    }

    /// Acquires the pool lock.
    ///
    /// The lock can never be poisoned by a job: jobs run outside the lock
    /// and their panics are caught in the worker loop.
    pub(crate) fn lock(&self) -> MutexGuard<'_, PoolState> {
        self.state.lock().expect("pool state lock poisoned")
    }

    pub(crate) fn next_worker_id(&self) -> WorkerId {
        self.next_worker_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Broadcasts `drained` if a joiner is waiting and the pool has just
    /// become quiescent.
    pub(crate) fn signal_if_drained(&self, state: &mut PoolState) {
        if state.wait_requested && state.is_drained() {
            state.wait_requested = false;
            self.drained.notify_all();
        }
    }
}
