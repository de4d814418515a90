mod worker;

use std::sync::Arc;
use std::thread;

use log::{debug, trace};
use parking_lot::{Condvar, Mutex};

use crate::errors::PoolError;
use crate::metrics::MetricsCollector;
use crate::queue::TaskQueue;
use crate::status::{StatusTable, TaskId, TaskState};
use worker::{worker_loop, WorkerHandle};

/// Queue plus lifecycle flags. Keeping both under one mutex lets the
/// worker wait-predicate ("task available or terminated") be evaluated
/// atomically, which is what makes termination race-free.
pub(crate) struct Dispatch<R> {
    pub(crate) queue: TaskQueue<R>,
    initialized: bool,
    pub(crate) terminated: bool,
}

impl<R> Dispatch<R> {
    fn running(&self) -> bool {
        self.initialized && !self.terminated
    }
}

/// State shared between the pool handle and its worker threads.
pub(crate) struct Shared<R> {
    pub(crate) dispatch: Mutex<Dispatch<R>>,
    pub(crate) task_ready: Condvar,
    pub(crate) statuses: StatusTable<R>,
    pub(crate) collector: Option<Arc<dyn MetricsCollector>>,
}

/// A fixed-size worker thread pool with per-task status tracking.
///
/// Tasks are zero-argument closures returning a value of type `R`.
/// Submission hands back a [`TaskId`]; [`status`](ThreadPool::status) is a
/// non-blocking snapshot of that task's lifecycle. Dispatch is strictly
/// FIFO; completion order is not guaranteed.
///
/// The pool is torn down either gracefully ([`terminate`]), where every
/// queued task still runs, or immediately ([`terminate_now`]), where
/// pending tasks are dropped and only in-flight ones finish. Both block
/// until all workers have joined, after which the pool may be
/// [`initialize`](ThreadPool::initialize)d again. Dropping the pool
/// performs a graceful terminate.
///
/// [`terminate`]: ThreadPool::terminate
/// [`terminate_now`]: ThreadPool::terminate_now
pub struct ThreadPool<R: Send + 'static = u64> {
    shared: Arc<Shared<R>>,
    workers: Mutex<Vec<WorkerHandle>>,
}

impl<R: Send + 'static> ThreadPool<R> {
    /// Creates a pool with no workers. Call
    /// [`initialize`](ThreadPool::initialize) before submitting; until
    /// then every submission is rejected.
    pub fn new() -> Self {
        Self::with_collector(None)
    }

    fn with_collector(collector: Option<Arc<dyn MetricsCollector>>) -> Self {
        Self {
            shared: Arc::new(Shared {
                dispatch: Mutex::new(Dispatch {
                    queue: TaskQueue::new(),
                    initialized: false,
                    terminated: false,
                }),
                task_ready: Condvar::new(),
                statuses: StatusTable::new(),
                collector,
            }),
            workers: Mutex::new(Vec::new()),
        }
    }

    /// Whether the pool currently accepts tasks.
    pub fn is_running(&self) -> bool {
        self.shared.dispatch.lock().running()
    }

    /// Number of live worker threads.
    pub fn worker_count(&self) -> usize {
        self.workers.lock().len()
    }

    /// Number of tasks currently waiting in the queue.
    pub fn queued_count(&self) -> usize {
        self.shared.dispatch.lock().queue.len()
    }

    /// Cumulative number of accepted submissions over the pool's history.
    pub fn submitted_count(&self) -> u64 {
        self.shared.dispatch.lock().queue.submitted()
    }

    /// Graceful termination: stops accepting tasks, lets the workers
    /// drain everything already queued, joins them, and resets the pool
    /// to its uninitialized state. No-op if the pool was not active.
    pub fn terminate(&self) {
        self.shutdown(false);
    }

    /// Immediate termination: discards every not-yet-dispatched task
    /// (their records stay [`TaskState::Pending`] forever), then behaves
    /// like [`terminate`](ThreadPool::terminate) for in-flight tasks.
    /// A task that is already executing always runs to completion.
    pub fn terminate_now(&self) {
        self.shutdown(true);
    }

    fn shutdown(&self, discard_pending: bool) {
        // Lock order everywhere: workers, then dispatch. Holding the
        // workers lock for the whole call serializes lifecycle changes,
        // so initialize cannot interleave with a termination.
        let mut workers = self.workers.lock();
        {
            let mut dispatch = self.shared.dispatch.lock();
            if discard_pending {
                let dropped = dispatch.queue.clear();
                if dropped > 0 {
                    debug!("immediate termination discarding {dropped} pending tasks");
                    if let Some(collector) = &self.shared.collector {
                        collector.on_tasks_discarded(dropped);
                    }
                }
            }
            if !dispatch.running() {
                dispatch.initialized = false;
                dispatch.terminated = false;
                workers.clear();
                return;
            }
            debug!(
                "termination requested with {} tasks queued",
                dispatch.queue.len()
            );
            dispatch.terminated = true;
        }
        self.shared.task_ready.notify_all();
        for worker in workers.iter_mut() {
            worker.join();
        }
        workers.clear();
        {
            let mut dispatch = self.shared.dispatch.lock();
            dispatch.terminated = false;
            dispatch.initialized = false;
        }
        if let Some(collector) = &self.shared.collector {
            collector.on_pool_terminated();
        }
        debug!("termination complete");
    }
}

impl<R: Send + Sync + Clone + 'static> ThreadPool<R> {
    /// Spawns `worker_count` threads and starts accepting tasks.
    ///
    /// Idempotent: a no-op while the pool is already initialized or a
    /// termination is still joining workers. `initialize(0)` leaves the
    /// pool uninitialized.
    pub fn initialize(&self, worker_count: usize) {
        let mut workers = self.workers.lock();
        {
            let mut dispatch = self.shared.dispatch.lock();
            if dispatch.initialized || dispatch.terminated || worker_count == 0 {
                return;
            }
            dispatch.initialized = true;
        }
        debug!("initializing {worker_count} workers");
        for id in 0..worker_count {
            let shared = Arc::clone(&self.shared);
            let handle = thread::spawn(move || worker_loop(id, shared));
            workers.push(WorkerHandle::new(id, handle));
            if let Some(collector) = &self.shared.collector {
                collector.on_worker_started();
            }
        }
    }

    /// Enqueues a task and wakes one worker.
    ///
    /// Never blocks on task execution.
    ///
    /// # Returns
    /// The new task's id, or [`PoolError::NotRunning`] when the pool is
    /// not initialized or is terminating (fail fast, no queuing).
    pub fn submit<F>(&self, f: F) -> Result<TaskId, PoolError>
    where
        F: FnOnce() -> R + Send + 'static,
    {
        let queue_len;
        let id;
        {
            let mut dispatch = self.shared.dispatch.lock();
            if !dispatch.running() {
                return Err(PoolError::NotRunning);
            }
            id = dispatch.queue.push(Box::new(f));
            // The record must exist before any worker can see the queue
            // entry; pops take the dispatch lock we are still holding.
            self.shared.statuses.set(id, TaskState::Pending);
            queue_len = dispatch.queue.len();
        }
        self.shared.task_ready.notify_one();
        if let Some(collector) = &self.shared.collector {
            collector.on_task_submitted(queue_len);
        }
        trace!("task {id} queued, queue length {queue_len}");
        Ok(id)
    }

    /// Non-blocking lifecycle snapshot for a task.
    ///
    /// # Returns
    /// The task's current [`TaskState`], or `None` for an id this pool
    /// never issued. Results of finished tasks remain readable after
    /// termination.
    pub fn status(&self, id: TaskId) -> Option<TaskState<R>> {
        self.shared.statuses.get(id)
    }
}

impl<R: Send + 'static> Default for ThreadPool<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Send + 'static> Drop for ThreadPool<R> {
    fn drop(&mut self) {
        self.terminate();
    }
}

/// Builder for [`ThreadPool`], following the crate's one-stop
/// configuration style.
///
/// # Example
/// ```rust
/// use trackpool::ThreadPoolBuilder;
///
/// let pool = ThreadPoolBuilder::new().num_threads(2).build();
/// let id = pool.submit(|| 21 * 2).unwrap();
/// pool.terminate();
/// assert!(pool.status(id).unwrap().is_done());
/// ```
pub struct ThreadPoolBuilder {
    num_threads: usize,
    metrics_collector: Option<Arc<dyn MetricsCollector>>,
}

impl ThreadPoolBuilder {
    /// Starts a builder with the default of 4 worker threads and no
    /// metrics collector.
    pub fn new() -> Self {
        Self {
            num_threads: 4,
            metrics_collector: None,
        }
    }

    /// Sets how many worker threads the pool will spawn.
    pub fn num_threads(mut self, n: usize) -> Self {
        self.num_threads = n;
        self
    }

    /// Attaches a metrics collector that will observe pool events.
    pub fn with_metrics_collector(mut self, collector: Arc<dyn MetricsCollector>) -> Self {
        self.metrics_collector = Some(collector);
        self
    }

    /// Builds the pool and initializes its workers.
    pub fn build<R: Send + Sync + Clone + 'static>(self) -> ThreadPool<R> {
        let pool = ThreadPool::with_collector(self.metrics_collector);
        pool.initialize(self.num_threads);
        pool
    }
}

impl Default for ThreadPoolBuilder {
    fn default() -> Self {
        Self::new()
    }
}
