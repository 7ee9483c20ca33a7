use std::any::Any;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

use crate::{PoolError, Result};

/// Outcome of a finished job: the value it produced, or the message of the
/// panic that ended it.
type Outcome<T> = std::result::Result<T, String>;

/// The write-once slot a worker stores a job's outcome into.
///
/// Exactly one producer (the worker executing the job) fulfills the cell;
/// any number of reads through the owning [`TaskHandle`] observe the same
/// outcome afterwards.
pub(crate) struct ResultCell<T> {
    slot: Mutex<Option<Outcome<T>>>,
    ready: Condvar,
}

impl<T> ResultCell<T> {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(ResultCell {
            slot: Mutex::new(None),
            ready: Condvar::new(),
        })
    }

    /// Runs `job` and stores its outcome, converting a panic into a stored
    /// failure instead of letting it unwind into the worker loop.
    pub(crate) fn run<F>(&self, job: F)
    where
        F: FnOnce() -> T,
    {
        let outcome = catch_unwind(AssertUnwindSafe(job)).map_err(panic_message);
        let mut slot = self.lock_slot();
        debug_assert!(slot.is_none(), "result cell fulfilled twice");
        *slot = Some(outcome);
        self.ready.notify_all();
    }

    fn lock_slot(&self) -> MutexGuard<'_, Option<Outcome<T>>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A handle to the eventual result of a submitted job.
///
/// The worker running the job fulfills the underlying cell exactly once;
/// the holder of the handle blocks in [`get`](TaskHandle::get) or
/// [`into_result`](TaskHandle::into_result) until then.
pub struct TaskHandle<T> {
    cell: Arc<ResultCell<T>>,
}

impl<T> TaskHandle<T> {
    pub(crate) fn new(cell: Arc<ResultCell<T>>) -> Self {
        TaskHandle { cell }
    }

    /// Blocks until the job has finished.
    pub fn wait(&self) {
        let _slot = self.ready_slot();
    }

    /// Returns `true` if the job has finished and its outcome is available.
    pub fn is_ready(&self) -> bool {
        self.cell.lock_slot().is_some()
    }

    /// Blocks until the job has finished, then returns its result.
    ///
    /// Repeated calls return the same outcome every time. A job that
    /// panicked surfaces as `PoolError::TaskFailed` carrying the panic
    /// message.
    pub fn get(&self) -> Result<T>
    where
        T: Clone,
    {
        let slot = self.ready_slot();
        match slot.as_ref().expect("result cell is ready") {
            Ok(value) => Ok(value.clone()),
            Err(cause) => Err(PoolError::TaskFailed(cause.clone())),
        }
    }

    /// Blocks until the job has finished, then moves the result out.
    ///
    /// Unlike [`get`](TaskHandle::get) this does not require `T: Clone`.
    pub fn into_result(self) -> Result<T> {
        let mut slot = self.ready_slot();
        match slot.take().expect("result cell is ready") {
            Ok(value) => Ok(value),
            Err(cause) => Err(PoolError::TaskFailed(cause)),
        }
    }

    /// Waits on the condvar until the slot has been fulfilled.
    fn ready_slot(&self) -> MutexGuard<'_, Option<Outcome<T>>> {
        let slot = self.cell.lock_slot();
        self.cell
            .ready
            .wait_while(slot, |slot| slot.is_none())
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> fmt::Debug for TaskHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskHandle")
            .field("ready", &self.is_ready())
            .finish()
    }
}

/// Renders a panic payload into a readable failure cause.
fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "job panicked".to_string()
    }
}
