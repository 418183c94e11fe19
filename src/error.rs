use std::io;
use thiserror::Error;

/// Error type for pool operations.
#[derive(Error, Debug)]
pub enum PoolError {
    /// Pool bounds rejected at creation time.
    #[error("invalid pool configuration: min_workers = {min}, max_workers = {max}")]
    InvalidConfiguration {
        /// The rejected floor.
        min: usize,
        /// The rejected ceiling.
        max: usize,
    },

    /// A worker thread could not be spawned.
    #[error("worker spawn failed: {0}")]
    ResourceExhausted(#[from] io::Error),
}

/// Result type alias for pool operations.
pub type Result<T> = std::result::Result<T, PoolError>;
