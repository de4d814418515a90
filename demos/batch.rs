//! Batch workload demo: submit tasks of random duration, wait a while,
//! then cut the pool off with immediate termination.
//!
//! Run with `RUST_LOG=trace` to see the per-event trace lines.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use trackpool::{
    metrics::{AtomicMetricsCollector, PoolMetrics},
    TaskState, ThreadPoolBuilder,
};

fn main() {
    env_logger::init();

    let metrics = Arc::new(PoolMetrics::new());
    let collector = Arc::new(AtomicMetricsCollector::new(metrics.clone()));
    let pool = ThreadPoolBuilder::new()
        .num_threads(4)
        .with_metrics_collector(collector)
        .build();

    // An explicit, seeded source keeps the workload reproducible.
    let mut rng = StdRng::seed_from_u64(42);
    let ids: Vec<_> = (0..10)
        .map(|_| {
            let millis = rng.gen_range(500..=1000u64);
            pool.submit(move || {
                thread::sleep(Duration::from_millis(millis));
                millis
            })
            .unwrap()
        })
        .collect();

    thread::sleep(Duration::from_millis(800));
    pool.terminate_now();

    for id in ids {
        match pool.status(id) {
            Some(TaskState::Done(millis)) => println!("task {id}: slept {millis} ms"),
            Some(TaskState::Pending) => println!("task {id}: discarded while waiting"),
            Some(state) => println!("task {id}: {state:?}"),
            None => println!("task {id}: unknown"),
        }
    }
    println!("{}", metrics.snapshot());
}
