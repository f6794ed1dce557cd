//! Engine errors.

/// Errors from driving the search worker.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The worker panicked or dropped its latch before starting.
    #[error("search worker lost")]
    WorkerLost,

    /// The operating system refused to start the worker thread.
    #[error("failed to spawn search worker: {0}")]
    Spawn(#[from] std::io::Error),
}
