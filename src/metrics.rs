//! Metrics collection for the thread pool.
//!
//! This module defines the [`MetricsCollector`] trait for observing thread
//! pool activity, plus a default atomic-counter implementation. Collection
//! is opt-in: a pool without a collector pays nothing beyond a branch per
//! event.

use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use log::info;

/// A trait for collecting metrics from the thread pool.
///
/// Implementations provide hooks for task and worker lifecycle events.
/// Hooks are invoked outside the pool's locks, so they may be arbitrarily
/// slow without stalling dispatch.
pub trait MetricsCollector: Send + Sync {
    /// Called when a task is accepted into the queue. `queue_len` is the
    /// queue length right after the insert.
    fn on_task_submitted(&self, queue_len: usize);
    /// Called when a worker picks a task up. `queue_wait` is the time the
    /// task spent queued; `queue_len` is the length right after the pop.
    fn on_task_started(&self, queue_wait: Duration, queue_len: usize);
    /// Called when a task completes and its result has been recorded.
    fn on_task_completed(&self);
    /// Called when a task body panics.
    fn on_task_failed(&self);
    /// Called when immediate termination drops pending tasks.
    fn on_tasks_discarded(&self, count: usize);
    /// Called when a worker thread starts.
    fn on_worker_started(&self);
    /// Called when a worker thread stops.
    fn on_worker_stopped(&self);
    /// Called once per termination, after every worker has joined.
    fn on_pool_terminated(&self);
}

/// Thread pool counters backed by atomics.
///
/// `queued_tasks`, `running_tasks` and `active_workers` are gauges; the
/// rest are cumulative over the pool's whole history, including across
/// re-initialization.
pub struct PoolMetrics {
    /// Number of tasks currently waiting in the queue.
    pub queued_tasks: AtomicUsize,
    /// Number of tasks currently being executed.
    pub running_tasks: AtomicUsize,
    /// Number of worker threads currently alive.
    pub active_workers: AtomicUsize,
    /// Total number of tasks ever accepted.
    pub submitted_tasks: AtomicU64,
    /// Total number of tasks that completed and produced a result.
    pub completed_tasks: AtomicU64,
    /// Total number of tasks that panicked.
    pub failed_tasks: AtomicU64,
    /// Total number of tasks dropped by immediate termination.
    pub discarded_tasks: AtomicU64,
    started_tasks: AtomicU64,
    queue_wait_nanos: AtomicU64,
    queue_len_sum: AtomicU64,
    queue_len_samples: AtomicU64,
}

impl PoolMetrics {
    /// Creates a new `PoolMetrics` with all counters at zero.
    pub fn new() -> Self {
        Self {
            queued_tasks: AtomicUsize::new(0),
            running_tasks: AtomicUsize::new(0),
            active_workers: AtomicUsize::new(0),
            submitted_tasks: AtomicU64::new(0),
            completed_tasks: AtomicU64::new(0),
            failed_tasks: AtomicU64::new(0),
            discarded_tasks: AtomicU64::new(0),
            started_tasks: AtomicU64::new(0),
            queue_wait_nanos: AtomicU64::new(0),
            queue_len_sum: AtomicU64::new(0),
            queue_len_samples: AtomicU64::new(0),
        }
    }

    /// Takes a point-in-time summary of the cumulative counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let started = self.started_tasks.load(Ordering::SeqCst);
        let samples = self.queue_len_samples.load(Ordering::SeqCst);
        let total_wait_ms =
            self.queue_wait_nanos.load(Ordering::SeqCst) as f64 * 1e-6;
        MetricsSnapshot {
            tasks_submitted: self.submitted_tasks.load(Ordering::SeqCst),
            tasks_completed: self.completed_tasks.load(Ordering::SeqCst),
            tasks_failed: self.failed_tasks.load(Ordering::SeqCst),
            tasks_discarded: self.discarded_tasks.load(Ordering::SeqCst),
            total_queue_wait_ms: total_wait_ms,
            avg_queue_wait_ms: if started == 0 {
                0.0
            } else {
                total_wait_ms / started as f64
            },
            avg_queue_len: if samples == 0 {
                0.0
            } else {
                self.queue_len_sum.load(Ordering::SeqCst) as f64 / samples as f64
            },
        }
    }
}

impl Default for PoolMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// End-of-life summary derived from [`PoolMetrics`].
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsSnapshot {
    pub tasks_submitted: u64,
    pub tasks_completed: u64,
    pub tasks_failed: u64,
    pub tasks_discarded: u64,
    /// Total time tasks spent queued before dispatch, in milliseconds.
    pub total_queue_wait_ms: f64,
    /// Average queue wait per dispatched task, in milliseconds.
    pub avg_queue_wait_ms: f64,
    /// Average queue length, sampled at every submit and dispatch.
    pub avg_queue_len: f64,
}

impl fmt::Display for MetricsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tasks submitted: {}, completed: {}, failed: {}, discarded: {}, \
             total queue wait: {:.3} ms, avg queue wait: {:.3} ms, \
             avg queue length: {:.3}",
            self.tasks_submitted,
            self.tasks_completed,
            self.tasks_failed,
            self.tasks_discarded,
            self.total_queue_wait_ms,
            self.avg_queue_wait_ms,
            self.avg_queue_len,
        )
    }
}

/// A default [`MetricsCollector`] that updates a shared [`PoolMetrics`]
/// and logs the summary when the pool terminates.
pub struct AtomicMetricsCollector {
    /// Shared metrics storage.
    pub metrics: Arc<PoolMetrics>,
}

impl AtomicMetricsCollector {
    /// Creates a collector writing into the provided metrics.
    pub fn new(metrics: Arc<PoolMetrics>) -> Self {
        Self { metrics }
    }
}

impl MetricsCollector for AtomicMetricsCollector {
    fn on_task_submitted(&self, queue_len: usize) {
        self.metrics.submitted_tasks.fetch_add(1, Ordering::SeqCst);
        self.metrics.queued_tasks.fetch_add(1, Ordering::SeqCst);
        self.metrics
            .queue_len_sum
            .fetch_add(queue_len as u64, Ordering::SeqCst);
        self.metrics.queue_len_samples.fetch_add(1, Ordering::SeqCst);
    }

    fn on_task_started(&self, queue_wait: Duration, queue_len: usize) {
        self.metrics.queued_tasks.fetch_sub(1, Ordering::SeqCst);
        self.metrics.running_tasks.fetch_add(1, Ordering::SeqCst);
        self.metrics.started_tasks.fetch_add(1, Ordering::SeqCst);
        self.metrics
            .queue_wait_nanos
            .fetch_add(queue_wait.as_nanos() as u64, Ordering::SeqCst);
        self.metrics
            .queue_len_sum
            .fetch_add(queue_len as u64, Ordering::SeqCst);
        self.metrics.queue_len_samples.fetch_add(1, Ordering::SeqCst);
    }

    fn on_task_completed(&self) {
        self.metrics.running_tasks.fetch_sub(1, Ordering::SeqCst);
        self.metrics.completed_tasks.fetch_add(1, Ordering::SeqCst);
    }

    fn on_task_failed(&self) {
        self.metrics.running_tasks.fetch_sub(1, Ordering::SeqCst);
        self.metrics.failed_tasks.fetch_add(1, Ordering::SeqCst);
    }

    fn on_tasks_discarded(&self, count: usize) {
        self.metrics.queued_tasks.fetch_sub(count, Ordering::SeqCst);
        self.metrics
            .discarded_tasks
            .fetch_add(count as u64, Ordering::SeqCst);
    }

    fn on_worker_started(&self) {
        self.metrics.active_workers.fetch_add(1, Ordering::SeqCst);
    }

    fn on_worker_stopped(&self) {
        self.metrics.active_workers.fetch_sub(1, Ordering::SeqCst);
    }

    fn on_pool_terminated(&self) {
        info!("{}", self.metrics.snapshot());
    }
}
