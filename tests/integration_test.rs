use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use trackpool::{
    metrics::{AtomicMetricsCollector, PoolMetrics},
    PoolError, TaskState, ThreadPool, ThreadPoolBuilder,
};

#[test]
fn submit_and_collect_result() {
    let pool = ThreadPoolBuilder::new().num_threads(2).build();
    let id = pool.submit(|| 6u64 * 7).unwrap();
    pool.terminate();
    assert_eq!(pool.status(id), Some(TaskState::Done(42)));
}

#[test]
fn graceful_terminate_drains_everything() {
    let pool = ThreadPoolBuilder::new().num_threads(4).build();
    let ids: Vec<_> = (0..20u64)
        .map(|i| pool.submit(move || i * 2).unwrap())
        .collect();

    pool.terminate();

    for (i, id) in ids.iter().enumerate() {
        assert_eq!(
            pool.status(*id),
            Some(TaskState::Done(i as u64 * 2)),
            "task {id} was dropped by graceful termination"
        );
    }
    assert_eq!(pool.submitted_count(), 20);
    assert_eq!(pool.queued_count(), 0);
}

#[test]
fn ids_are_unique_and_strictly_increasing() {
    let pool = ThreadPoolBuilder::new().num_threads(2).build();
    let ids: Vec<_> = (0..100u64).map(|i| pool.submit(move || i).unwrap()).collect();
    pool.terminate();

    assert_eq!(ids, (0..100).collect::<Vec<_>>());
}

#[test]
fn unknown_id_has_no_state() {
    let pool: ThreadPool<u64> = ThreadPoolBuilder::new().num_threads(1).build();
    assert_eq!(pool.status(9999), None);
    pool.terminate();
}

#[test]
fn status_reflects_pending_running_done() {
    let pool = ThreadPoolBuilder::new().num_threads(1).build();
    let (release_tx, release_rx) = mpsc::channel::<()>();

    // Occupies the only worker until released.
    let blocker = pool
        .submit(move || {
            release_rx.recv().unwrap();
            1u64
        })
        .unwrap();
    let queued = pool.submit(|| 2u64).unwrap();

    // Give the worker time to dispatch the blocker.
    thread::sleep(Duration::from_millis(50));
    assert_eq!(pool.status(blocker), Some(TaskState::Running));
    assert_eq!(pool.status(queued), Some(TaskState::Pending));

    release_tx.send(()).unwrap();
    pool.terminate();
    assert_eq!(pool.status(blocker), Some(TaskState::Done(1)));
    assert_eq!(pool.status(queued), Some(TaskState::Done(2)));
}

#[test]
fn workers_run_in_parallel() {
    let pool = ThreadPoolBuilder::new().num_threads(4).build();
    let start = Instant::now();
    let ids: Vec<_> = (0..10u64)
        .map(|i| {
            pool.submit(move || {
                thread::sleep(Duration::from_millis(100));
                i
            })
            .unwrap()
        })
        .collect();
    pool.terminate();
    let elapsed = start.elapsed();

    for id in &ids {
        assert!(pool.status(*id).unwrap().is_done());
    }
    // 10 tasks of 100 ms on 4 workers drain in about 3 batches; a serial
    // pool would need a full second.
    assert!(
        elapsed < Duration::from_millis(800),
        "drain took {elapsed:?}, tasks did not run in parallel"
    );
}

#[test]
fn terminate_now_discards_pending_tasks() {
    let pool = ThreadPoolBuilder::new().num_threads(1).build();
    let ids: Vec<_> = (0..5u64)
        .map(|i| {
            pool.submit(move || {
                thread::sleep(Duration::from_millis(200));
                i
            })
            .unwrap()
        })
        .collect();

    thread::sleep(Duration::from_millis(50));
    pool.terminate_now();

    // The task already dispatched runs to completion.
    assert_eq!(pool.status(ids[0]), Some(TaskState::Done(0)));
    assert!(pool.status(ids[0]).unwrap().is_settled());
    // Everything still queued at the call stays pending permanently.
    for id in &ids[1..] {
        assert_eq!(pool.status(*id), Some(TaskState::Pending));
        assert!(!pool.status(*id).unwrap().is_settled());
    }
    thread::sleep(Duration::from_millis(300));
    for id in &ids[1..] {
        assert_eq!(pool.status(*id), Some(TaskState::Pending));
    }
}

#[test]
fn initialize_is_idempotent() {
    let pool: ThreadPool<u64> = ThreadPoolBuilder::new().num_threads(2).build();
    assert_eq!(pool.worker_count(), 2);

    // Already initialized: the second call must not add workers.
    pool.initialize(8);
    assert_eq!(pool.worker_count(), 2);
    pool.terminate();
    assert_eq!(pool.worker_count(), 0);
}

#[test]
fn pool_can_be_reinitialized_after_terminate() {
    let pool: ThreadPool<u64> = ThreadPoolBuilder::new().num_threads(2).build();
    let first = pool.submit(|| 1).unwrap();
    pool.terminate();
    assert!(!pool.is_running());

    pool.initialize(3);
    assert!(pool.is_running());
    assert_eq!(pool.worker_count(), 3);

    let second = pool.submit(|| 2).unwrap();
    assert!(second > first, "ids must not be reused across lifetimes");
    pool.terminate();
    assert_eq!(pool.status(second), Some(TaskState::Done(2)));
    // Results from the previous lifetime stay readable.
    assert_eq!(pool.status(first), Some(TaskState::Done(1)));
}

#[test]
fn submission_is_rejected_when_not_running() {
    let pool: ThreadPool<u64> = ThreadPool::new();
    assert_eq!(pool.submit(|| 1).unwrap_err(), PoolError::NotRunning);

    pool.initialize(1);
    assert!(pool.submit(|| 1).is_ok());
    pool.terminate();
    assert_eq!(pool.submit(|| 1).unwrap_err(), PoolError::NotRunning);
}

#[test]
fn initialize_zero_workers_stays_uninitialized() {
    let pool: ThreadPool<u64> = ThreadPool::new();
    pool.initialize(0);
    assert!(!pool.is_running());
    assert_eq!(pool.submit(|| 1).unwrap_err(), PoolError::NotRunning);
}

#[test]
fn panicking_task_is_marked_failed() {
    let pool = ThreadPoolBuilder::new().num_threads(1).build();
    let bad = pool.submit(|| -> u64 { panic!("task blew up") }).unwrap();
    let good = pool.submit(|| 5u64).unwrap();
    pool.terminate();

    assert_eq!(pool.status(bad), Some(TaskState::Failed));
    // The worker survives the panic and keeps draining.
    assert_eq!(pool.status(good), Some(TaskState::Done(5)));
}

#[test]
fn concurrent_submissions_are_never_lost_or_duplicated() {
    let pool = Arc::new(ThreadPoolBuilder::new().num_threads(4).build());
    let executed = Arc::new(AtomicUsize::new(0));
    let ids = Arc::new(Mutex::new(Vec::new()));

    let submitters: Vec<_> = (0..4)
        .map(|_| {
            let pool = Arc::clone(&pool);
            let executed = Arc::clone(&executed);
            let ids = Arc::clone(&ids);
            thread::spawn(move || {
                for _ in 0..200 {
                    let executed = Arc::clone(&executed);
                    let id = pool
                        .submit(move || executed.fetch_add(1, Ordering::SeqCst) as u64)
                        .unwrap();
                    ids.lock().unwrap().push(id);
                }
            })
        })
        .collect();
    for handle in submitters {
        handle.join().unwrap();
    }

    pool.terminate();

    assert_eq!(executed.load(Ordering::SeqCst), 800);
    let mut ids = ids.lock().unwrap().clone();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 800, "an id was issued twice");
    for id in ids {
        assert!(pool.status(id).unwrap().is_done());
    }
}

#[test]
fn metrics_track_the_whole_run() {
    let metrics = Arc::new(PoolMetrics::new());
    let collector = Arc::new(AtomicMetricsCollector::new(metrics.clone()));
    let pool = ThreadPoolBuilder::new()
        .num_threads(2)
        .with_metrics_collector(collector)
        .build();

    assert_eq!(metrics.active_workers.load(Ordering::SeqCst), 2);
    for i in 0..5u64 {
        pool.submit(move || i).unwrap();
    }
    pool.terminate();

    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.tasks_submitted, 5);
    assert_eq!(snapshot.tasks_completed, 5);
    assert_eq!(snapshot.tasks_failed, 0);
    assert_eq!(snapshot.tasks_discarded, 0);
    assert_eq!(metrics.active_workers.load(Ordering::SeqCst), 0);
    assert_eq!(metrics.queued_tasks.load(Ordering::SeqCst), 0);
    assert_eq!(metrics.running_tasks.load(Ordering::SeqCst), 0);
}

#[test]
fn metrics_count_discarded_tasks() {
    let metrics = Arc::new(PoolMetrics::new());
    let collector = Arc::new(AtomicMetricsCollector::new(metrics.clone()));
    let pool = ThreadPoolBuilder::new()
        .num_threads(1)
        .with_metrics_collector(collector)
        .build();

    let ids: Vec<_> = (0..5)
        .map(|_| {
            pool.submit(|| {
                thread::sleep(Duration::from_millis(300));
                0u64
            })
            .unwrap()
        })
        .collect();

    // Wait for the worker to actually dispatch the first task; a fixed
    // sleep is not enough on a loaded machine.
    let deadline = Instant::now() + Duration::from_secs(5);
    while pool.status(ids[0]) != Some(TaskState::Running) {
        assert!(Instant::now() < deadline, "task 0 was never dispatched");
        thread::sleep(Duration::from_millis(2));
    }
    pool.terminate_now();

    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.tasks_submitted, 5);
    assert_eq!(snapshot.tasks_discarded, 4);
    assert_eq!(snapshot.tasks_completed, 1);
}

#[test]
fn dropping_the_pool_terminates_gracefully() {
    let metrics = Arc::new(PoolMetrics::new());
    {
        let collector = Arc::new(AtomicMetricsCollector::new(metrics.clone()));
        let pool = ThreadPoolBuilder::new()
            .num_threads(2)
            .with_metrics_collector(collector)
            .build();
        for i in 0..5u64 {
            pool.submit(move || {
                thread::sleep(Duration::from_millis(50));
                i
            })
            .unwrap();
        }
        // The pool goes out of scope with work still queued.
    }

    // Drop drains the queue like an explicit terminate: nothing is lost.
    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.tasks_submitted, 5);
    assert_eq!(snapshot.tasks_completed, 5);
    assert_eq!(snapshot.tasks_discarded, 0);
    assert_eq!(metrics.active_workers.load(Ordering::SeqCst), 0);
}
