//! Worker logic for the thread pool.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;

use log::{debug, trace, warn};

use super::Shared;
use crate::status::TaskState;

pub(crate) struct WorkerHandle {
    id: usize,
    thread: Option<thread::JoinHandle<()>>,
}

impl WorkerHandle {
    pub(crate) fn new(id: usize, thread: thread::JoinHandle<()>) -> Self {
        Self {
            id,
            thread: Some(thread),
        }
    }

    pub(crate) fn join(&mut self) {
        if let Some(handle) = self.thread.take() {
            if handle.join().is_err() {
                warn!("worker {} exited by panicking", self.id);
            }
        }
    }
}

/// Worker thread main loop: block until a task is available or the pool
/// is terminating, drain one task at a time, record its outcome.
///
/// The dispatch lock is held only around the pop; the task body runs
/// unlocked so long tasks never stall submission or status queries.
pub(crate) fn worker_loop<R>(worker_id: usize, shared: Arc<Shared<R>>)
where
    R: Send + Sync + Clone + 'static,
{
    debug!("worker {worker_id} started");
    loop {
        let (entry, queue_len) = {
            let mut dispatch = shared.dispatch.lock();
            let entry = loop {
                // Pop before looking at the flag: graceful termination
                // drains everything already queued.
                if let Some(entry) = dispatch.queue.pop() {
                    break Some(entry);
                }
                if dispatch.terminated {
                    break None;
                }
                shared.task_ready.wait(&mut dispatch);
            };
            match entry {
                Some(entry) => {
                    let len = dispatch.queue.len();
                    (entry, len)
                }
                None => {
                    drop(dispatch);
                    debug!("worker {worker_id} stopping");
                    if let Some(collector) = &shared.collector {
                        collector.on_worker_stopped();
                    }
                    return;
                }
            }
        };

        let queue_wait = entry.enqueued_at.elapsed();
        shared.statuses.set(entry.id, TaskState::Running);
        if let Some(collector) = &shared.collector {
            collector.on_task_started(queue_wait, queue_len);
        }
        trace!(
            "task {} started on worker {worker_id} after {:.3} ms in queue",
            entry.id,
            queue_wait.as_secs_f64() * 1e3,
        );

        match panic::catch_unwind(AssertUnwindSafe(entry.job)) {
            Ok(value) => {
                shared.statuses.set(entry.id, TaskState::Done(value));
                if let Some(collector) = &shared.collector {
                    collector.on_task_completed();
                }
                trace!("task {} finished", entry.id);
            }
            Err(_) => {
                shared.statuses.set(entry.id, TaskState::Failed);
                if let Some(collector) = &shared.collector {
                    collector.on_task_failed();
                }
                warn!("task {} panicked", entry.id);
            }
        }
    }
}
