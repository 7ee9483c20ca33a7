use std::thread;

use super::ThreadPool;
use crate::{PoolError, Result};

/// A naive thread pool that spawns a new thread for every job.
///
/// This is the simplest possible "pool": it doesn't reuse threads at all.
/// Useful as a baseline for benchmarking against the shared-queue pool.
pub struct NaiveThreadPool;

impl ThreadPool for NaiveThreadPool {
    fn new(threads: u32) -> Result<Self> {
        if threads == 0 {
            return Err(PoolError::InvalidWorkerCount(threads));
        }
        Ok(NaiveThreadPool)
    }

    fn spawn<F>(&self, job: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        thread::Builder::new().spawn(job)?;
        Ok(())
    }
}
