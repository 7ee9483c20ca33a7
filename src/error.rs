use std::io;
use thiserror::Error;

/// Error type for thread pool operations.
#[derive(Error, Debug)]
pub enum PoolError {
    /// IO error from spawning a worker thread.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The requested worker count is not a positive number.
    #[error("Invalid worker count: {0}")]
    InvalidWorkerCount(u32),

    /// The pool has shut down and no longer accepts jobs.
    #[error("Thread pool is closed")]
    PoolClosed,

    /// A submitted job panicked while running on a worker.
    #[error("Task failed: {0}")]
    TaskFailed(String),
}

/// Result type alias for thread pool operations.
pub type Result<T> = std::result::Result<T, PoolError>;
