//! Error types for the thread pool.

/// Represents errors that can occur in the thread pool.
///
/// Submission failures are reported synchronously through this type; the
/// pool never blocks or panics to signal them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolError {
    /// The pool is not accepting tasks: it was never initialized, or a
    /// termination is in progress.
    NotRunning,
}

impl std::fmt::Display for PoolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PoolError::NotRunning => write!(f, "thread pool is not running"),
        }
    }
}

impl std::error::Error for PoolError {}
