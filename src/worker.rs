use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use log::{debug, error};

use crate::monitor::{Monitor, PoolState, WorkerId};
use crate::Result;

/// Spawns one worker thread and bumps the live-thread count.
///
/// Must be called with the pool lock held: the count is updated before the
/// lock is released, so a concurrent submitter already sees the new
/// capacity and does not over-spawn. The new thread blocks on the lock
/// until the caller releases it.
pub(crate) fn spawn_worker(monitor: &Arc<Monitor>, state: &mut PoolState) -> Result<()> {
    let id = monitor.next_worker_id();
    let shared = Arc::clone(monitor);
    monitor
        .thread_config
        .thread_builder(id)
        .spawn(move || worker_loop(shared, id))?;
    state.nthreads += 1;
    Ok(())
}

/// The worker state machine: wait for a job, run it outside the lock,
/// report completion, and exit on shutdown or idle timeout.
fn worker_loop(monitor: Arc<Monitor>, id: WorkerId) {
    debug!("worker {id} started");
    let mut state = monitor.lock();
    loop {
        let mut timed_out = false;
        while state.queue.is_empty() && !state.destroying && !timed_out {
            state.idle += 1;
            match monitor.idle_timeout {
                None => {
                    state = monitor
                        .job_available
                        .wait(state)
                        .expect("pool state lock poisoned");
                }
                Some(timeout) => {
                    let (guard, result) = monitor
                        .job_available
                        .wait_timeout(state, timeout)
                        .expect("pool state lock poisoned");
                    state = guard;
                    timed_out = result.timed_out();
                }
            }
            state.idle -= 1;
        }

        if state.destroying {
            break;
        }

        if let Some(job) = state.queue.pop_front() {
            state.active.insert(id);
            drop(state);

            debug!("worker {id} executing job");
            // The pool does not report job-level failures; catching the
            // panic keeps this worker and the pool bookkeeping alive.
            if catch_unwind(AssertUnwindSafe(job)).is_err() {
                error!("worker {id}: job panicked");
            }

            state = monitor.lock();
            state.active.remove(&id);
            monitor.signal_if_drained(&mut state);
            continue;
        }

        // Queue still empty after a full idle timeout: shrink, but never
        // below the floor. A submission that raced with the timeout was
        // already claimed by the dequeue above.
        if timed_out && state.nthreads > monitor.min_workers {
            break;
        }
    }

    state.nthreads -= 1;
    if state.nthreads < monitor.min_workers && !state.destroying {
        // Keep the pool at its floor. Failure leaves the pool below the
        // floor until the next submission grows it again.
        if let Err(e) = spawn_worker(&monitor, &mut state) {
            error!("worker {id}: failed to spawn replacement: {e}");
        }
    }
    if state.destroying && state.nthreads == 0 {
        monitor.all_exited.notify_all();
    }
    debug!("worker {id} exiting");
}
