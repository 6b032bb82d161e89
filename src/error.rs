use crate::decomposition::Direction;

/// Everything that can stop a run. Nothing here is retried, a
/// deterministic simulation has nothing to retry against.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("{rows} rows cannot be split evenly across {workers} workers")]
    PartitionMismatch { rows: usize, workers: usize },

    #[error("unstable time step: courant number {courant} exceeds {limit}")]
    CflViolation { courant: f64, limit: f64 },

    #[error("worker {rank}: {direction} neighbor hung up before sending its ghost row")]
    HaloDisconnected { rank: usize, direction: Direction },

    #[error("worker {rank}: ghost row for step {received} arrived during step {expected}")]
    HaloStepMismatch {
        rank: usize,
        expected: usize,
        received: usize,
    },

    #[error("worker {rank} panicked")]
    WorkerPanicked { rank: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
