use std::panic::{catch_unwind, AssertUnwindSafe};
use std::thread;

use crossbeam::channel::{self, Receiver, Sender};
use log::{debug, error};

use super::ThreadPool;
use crate::{PoolError, Result};

/// A boxed, type-erased unit of work pulled off the shared queue.
type Job = Box<dyn FnOnce() + Send + 'static>;

/// A thread pool using a shared job queue.
///
/// Workers pull jobs from a single MPMC channel in submission order.
/// Closing the pool disconnects the queue: workers drain the jobs still
/// buffered in it, then exit, and the close blocks until every worker
/// has been joined.
pub struct SharedQueueThreadPool {
    tx: Option<Sender<Job>>,
    workers: Vec<thread::JoinHandle<()>>,
}

impl SharedQueueThreadPool {
    /// Creates a pool with one worker per available CPU.
    pub fn with_num_cpus() -> Result<Self> {
        Self::new(num_cpus::get() as u32)
    }

    /// Shuts the pool down, draining the queue first.
    ///
    /// No new jobs are accepted once this has been called. Blocks until
    /// every queued and in-flight job has finished and all workers have
    /// been joined. A second call is a no-op.
    pub fn close(&mut self) {
        if let Some(tx) = self.tx.take() {
            debug!("Pool closing, draining {} workers", self.workers.len());
            drop(tx);
        }
        for worker in self.workers.drain(..) {
            if worker.join().is_err() {
                error!("Worker thread panicked before shutdown");
            }
        }
    }
}

impl ThreadPool for SharedQueueThreadPool {
    fn new(threads: u32) -> Result<Self> {
        if threads == 0 {
            return Err(PoolError::InvalidWorkerCount(threads));
        }

        let (tx, rx) = channel::unbounded::<Job>();

        let mut workers = Vec::with_capacity(threads as usize);
        for id in 0..threads {
            workers.push(spawn_worker(id, rx.clone())?);
        }

        Ok(SharedQueueThreadPool {
            tx: Some(tx),
            workers,
        })
    }

    fn spawn<F>(&self, job: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let tx = self.tx.as_ref().ok_or(PoolError::PoolClosed)?;
        tx.send(Box::new(job)).map_err(|_| PoolError::PoolClosed)
    }
}

/// Spawns a single worker thread that pulls jobs from the receiver until
/// the queue has been disconnected and drained.
fn spawn_worker(id: u32, rx: Receiver<Job>) -> Result<thread::JoinHandle<()>> {
    let handle = thread::Builder::new()
        .name(format!("pool-worker-{id}"))
        .spawn(move || {
            loop {
                match rx.recv() {
                    Ok(job) => {
                        debug!("Worker {id} executing job");
                        // Catch panics so the worker loop continues
                        if catch_unwind(AssertUnwindSafe(job)).is_err() {
                            error!("Worker {id} job panicked, continuing");
                        }
                    }
                    Err(_) => {
                        debug!("Worker {id}: queue closed and drained, shutting down");
                        return;
                    }
                }
            }
        })?;
    Ok(handle)
}

impl Drop for SharedQueueThreadPool {
    fn drop(&mut self) {
        self.close();
    }
}
