use tracing::warn;

#[cfg(feature = "mt")]
pub fn install<R, F>(threads: usize, f: F) -> R
where
    R: Send,
    F: FnOnce() -> R + Send,
{
    if threads == 0 {
        return f();
    }
    match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
        Ok(pool) => pool.install(f),
        Err(err) => {
            warn!(error = %err, threads, "failed to build thread pool, using global pool");
            f()
        }
    }
}

#[cfg(not(feature = "mt"))]
pub fn install<R, F>(threads: usize, f: F) -> R
where
    R: Send,
    F: FnOnce() -> R + Send,
{
    if threads > 1 {
        warn!(threads, "built without feature 'mt', running single-threaded");
    }
    f()
}
