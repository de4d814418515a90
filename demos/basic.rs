fn main() {
    env_logger::init();

    let pool = trackpool::ThreadPoolBuilder::new().num_threads(4).build();
    let id = pool
        .submit(|| {
            println!("Hello from the thread pool!");
            10u64
        })
        .unwrap();
    pool.terminate();
    println!("Task {} ended as {:?}", id, pool.status(id));
}
