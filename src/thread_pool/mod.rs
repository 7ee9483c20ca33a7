use std::sync::Arc;

use crate::handle::ResultCell;
use crate::{Result, TaskHandle};

/// A thread pool for executing jobs concurrently.
///
/// Implementors manage a pool of worker threads and distribute
/// incoming jobs across them.
pub trait ThreadPool {
    /// Creates a new thread pool with the given number of threads.
    ///
    /// # Errors
    ///
    /// Returns an error if `threads` is zero or if a worker thread
    /// cannot be spawned.
    fn new(threads: u32) -> Result<Self>
    where
        Self: Sized;

    /// Spawns a fire-and-forget job into the thread pool.
    ///
    /// The job will be executed by one of the threads in the pool.
    ///
    /// # Errors
    ///
    /// Returns an error if the pool has shut down; the job is not
    /// enqueued in that case.
    fn spawn<F>(&self, job: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static;

    /// Submits a job and returns a handle to its eventual result.
    ///
    /// The job runs on a worker like a spawned one, but its return value
    /// (or the panic that ended it) is captured and made available
    /// through the returned [`TaskHandle`].
    ///
    /// # Errors
    ///
    /// Returns an error if the pool has shut down.
    fn submit<F, T>(&self, job: F) -> Result<TaskHandle<T>>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let cell = ResultCell::new();
        let worker_cell = Arc::clone(&cell);
        self.spawn(move || worker_cell.run(job))?;
        Ok(TaskHandle::new(cell))
    }
}

mod naive;
mod shared_queue;

pub use self::naive::NaiveThreadPool;
pub use self::shared_queue::SharedQueueThreadPool;
