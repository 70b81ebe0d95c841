//! Shared thread pool for bootstrap replicates.
//!
//! All bootstrap stages install their work on one lazily built pool instead
//! of rayon's global pool, so the report never competes with a host
//! application's own rayon configuration.

#[cfg(feature = "parallel")]
use rayon::ThreadPool;

#[cfg(feature = "parallel")]
use std::sync::OnceLock;

#[cfg(feature = "parallel")]
static THREAD_POOL: OnceLock<ThreadPool> = OnceLock::new();

/// Get or initialize the shared thread pool.
///
/// The pool has one thread per logical CPU and 8 MB stacks; `DIFFASYM_THREADS`
/// overrides the thread count.
#[cfg(feature = "parallel")]
pub fn get_thread_pool() -> &'static ThreadPool {
    THREAD_POOL.get_or_init(|| {
        let threads = std::env::var("DIFFASYM_THREADS")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(0);
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("diffasym-bootstrap-{i}"))
            .stack_size(8 * 1024 * 1024)
            .build()
            .expect("Failed to build bootstrap thread pool")
    })
}

/// Execute a parallel operation on the shared pool.
#[cfg(feature = "parallel")]
pub fn install<OP, R>(op: OP) -> R
where
    OP: FnOnce() -> R + Send,
    R: Send,
{
    get_thread_pool().install(op)
}

/// Execute `op` directly (no `parallel` feature).
#[cfg(not(feature = "parallel"))]
pub fn install<OP, R>(op: OP) -> R
where
    OP: FnOnce() -> R,
{
    op()
}
