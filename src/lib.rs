//! # trackpool
//!
//! `trackpool` is a fixed-size worker thread pool that executes submitted
//! tasks from a single shared FIFO queue, tracks each task's lifecycle
//! through an opaque id, and supports two termination modes: graceful
//! drain and immediate cancel-pending.
//!
//! ## Features
//! - Submit zero-argument tasks and get back a [`TaskId`].
//! - Poll any task's state at any time: `Pending`, `Running`,
//!   `Done(value)` or `Failed`. An unknown id is simply `None`.
//! - Strict FIFO dispatch from one shared queue.
//! - Graceful termination (drain everything) or immediate termination
//!   (drop what has not started yet).
//! - Re-initializable lifecycle: a terminated pool can be brought back up.
//! - Opt-in metrics collection and `log`-based event tracing.
//!
//! ## Usage
//!
//! ### Basic usage
//! ```rust
//! use trackpool::{TaskState, ThreadPoolBuilder};
//!
//! // Create a thread pool with default settings (4 threads).
//! let pool = ThreadPoolBuilder::new().build();
//!
//! // Submit a task and remember its id.
//! let id = pool.submit(|| 40 + 2).unwrap();
//!
//! // Graceful termination runs everything still queued.
//! pool.terminate();
//! assert_eq!(pool.status(id), Some(TaskState::Done(42)));
//! ```
//!
//! ### Polling task status
//! ```rust
//! use trackpool::{TaskState, ThreadPoolBuilder};
//!
//! let pool = ThreadPoolBuilder::new().num_threads(2).build();
//! let id = pool.submit(|| {
//!     std::thread::sleep(std::time::Duration::from_millis(20));
//!     7u64
//! }).unwrap();
//!
//! // The query never blocks; before completion it reports the phase.
//! match pool.status(id) {
//!     Some(TaskState::Pending) | Some(TaskState::Running) => {}
//!     Some(TaskState::Done(v)) => assert_eq!(v, 7),
//!     other => panic!("unexpected state: {other:?}"),
//! }
//! pool.terminate();
//! ```
//!
//! ### Immediate termination
//! ```rust
//! use trackpool::ThreadPoolBuilder;
//!
//! let pool = ThreadPoolBuilder::new().num_threads(1).build();
//! for _ in 0..4 {
//!     pool.submit(|| std::thread::sleep(std::time::Duration::from_millis(50)))
//!         .unwrap();
//! }
//! // Drops whatever has not been dispatched yet; the in-flight task
//! // still runs to completion.
//! pool.terminate_now();
//! ```
//!
//! ### Explicit lifecycle
//! ```rust
//! use trackpool::ThreadPool;
//!
//! let pool: ThreadPool<u64> = ThreadPool::new();
//! assert!(pool.submit(|| 1).is_err()); // not initialized yet
//!
//! pool.initialize(2);
//! let id = pool.submit(|| 1).unwrap();
//! pool.terminate();
//!
//! pool.initialize(2); // a terminated pool can be restarted
//! assert!(pool.is_running());
//! pool.terminate();
//! # let _ = id;
//! ```
//!
//! ### Collecting metrics
//! ```rust
//! use std::sync::Arc;
//! use trackpool::{
//!     metrics::{AtomicMetricsCollector, PoolMetrics},
//!     ThreadPoolBuilder,
//! };
//!
//! let metrics = Arc::new(PoolMetrics::new());
//! let collector = Arc::new(AtomicMetricsCollector::new(metrics.clone()));
//!
//! let pool = ThreadPoolBuilder::new()
//!     .num_threads(4)
//!     .with_metrics_collector(collector)
//!     .build();
//!
//! for i in 0..5u64 {
//!     pool.submit(move || i * i).unwrap();
//! }
//! pool.terminate();
//!
//! let snapshot = metrics.snapshot();
//! assert_eq!(snapshot.tasks_submitted, 5);
//! assert_eq!(snapshot.tasks_completed, 5);
//! println!("{snapshot}");
//! ```

mod errors;
pub mod metrics;
pub mod pool;
mod queue;
mod status;

pub use errors::PoolError;
pub use pool::{ThreadPool, ThreadPoolBuilder};
pub use status::{TaskId, TaskState};
