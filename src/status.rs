//! Per-task lifecycle tracking.
//!
//! Every accepted submission gets a [`TaskId`] and a record in the status
//! table. Records move strictly forward, from `Pending` through `Running`
//! to `Done` or `Failed`, and are never removed, so a result stays
//! readable after the pool has been terminated.

use std::collections::HashMap;

use parking_lot::RwLock;

/// Opaque task identifier, unique per pool and monotonically increasing
/// in submission order, starting at 0.
pub type TaskId = u64;

/// Lifecycle snapshot of a submitted task.
///
/// An id the pool never issued has no state at all; queries for it return
/// `None` rather than overloading one of these variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState<R> {
    /// Queued, not yet picked up by a worker. Tasks discarded by
    /// [`terminate_now`](crate::ThreadPool::terminate_now) stay in this
    /// state permanently.
    Pending,
    /// Currently executing on a worker thread.
    Running,
    /// Execution finished; carries the task's return value.
    Done(R),
    /// The task body panicked. The worker survives; no result exists.
    Failed,
}

impl<R> TaskState<R> {
    /// Returns `true` once the task has produced a result.
    pub fn is_done(&self) -> bool {
        matches!(self, TaskState::Done(_))
    }

    /// Returns `true` once the task has reached a terminal state,
    /// either `Done` or `Failed`.
    pub fn is_settled(&self) -> bool {
        matches!(self, TaskState::Done(_) | TaskState::Failed)
    }
}

/// Task id to state map, its own lock domain: status queries never
/// contend with queue dispatch.
pub(crate) struct StatusTable<R> {
    entries: RwLock<HashMap<TaskId, TaskState<R>>>,
}

impl<R> StatusTable<R> {
    pub(crate) fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub(crate) fn set(&self, id: TaskId, state: TaskState<R>) {
        self.entries.write().insert(id, state);
    }
}

impl<R: Clone> StatusTable<R> {
    pub(crate) fn get(&self, id: TaskId) -> Option<TaskState<R>> {
        self.entries.read().get(&id).cloned()
    }
}
