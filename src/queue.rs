//! FIFO task queue with id assignment.

use std::collections::VecDeque;
use std::time::Instant;

use crate::status::TaskId;

/// A queued unit of work: zero-argument, arguments bound at submission.
pub(crate) type Job<R> = Box<dyn FnOnce() -> R + Send + 'static>;

pub(crate) struct QueuedTask<R> {
    pub(crate) id: TaskId,
    pub(crate) enqueued_at: Instant,
    pub(crate) job: Job<R>,
}

/// Ordered store of pending tasks.
///
/// Assigns each submission the next sequential id. Ids are never
/// reissued, even across re-initialization. The queue is not internally
/// synchronized: the pool's dispatch mutex owns it, so every push and
/// pop is already exclusive.
pub(crate) struct TaskQueue<R> {
    entries: VecDeque<QueuedTask<R>>,
    next_id: TaskId,
    submitted: u64,
}

impl<R> TaskQueue<R> {
    pub(crate) fn new() -> Self {
        Self {
            entries: VecDeque::new(),
            next_id: 0,
            submitted: 0,
        }
    }

    /// Appends a job at the back and returns its freshly assigned id.
    pub(crate) fn push(&mut self, job: Job<R>) -> TaskId {
        let id = self.next_id;
        self.next_id += 1;
        self.submitted += 1;
        self.entries.push_back(QueuedTask {
            id,
            enqueued_at: Instant::now(),
            job,
        });
        id
    }

    /// Removes and returns the front entry, if any. Never blocks; waiting
    /// for work is the caller's condition-variable business.
    pub(crate) fn pop(&mut self) -> Option<QueuedTask<R>> {
        self.entries.pop_front()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Discards every pending entry and reports how many were dropped.
    /// Used only by immediate termination.
    pub(crate) fn clear(&mut self) -> usize {
        let dropped = self.entries.len();
        self.entries.clear();
        dropped
    }

    /// Cumulative number of submissions ever accepted. Never decreases.
    pub(crate) fn submitted(&self) -> u64 {
        self.submitted
    }
}
