#![deny(missing_docs)]

//! A bounded, dynamically-sized worker thread pool.
//!
//! The pool manages between `min_workers` and `max_workers` OS threads.
//! It starts empty, grows one worker per submission while every existing
//! worker is busy, and shrinks back toward the floor once workers have
//! been idle past a configurable timeout. Submitted jobs run in FIFO
//! order; [`ThreadPool::join`] blocks until all pending and in-flight
//! work has finished, and dropping the pool tears it down completely.
//!
//! ```
//! use dynpool::ThreadPool;
//!
//! let pool = ThreadPool::with_default_size()?;
//! for i in 0..8 {
//!     pool.spawn(move || {
//!         let _ = i * i;
//!     });
//! }
//! pool.join();
//! # Ok::<(), dynpool::PoolError>(())
//! ```

mod config;
mod error;
mod monitor;
mod pool;
mod worker;

pub use config::ThreadConfig;
pub use error::{PoolError, Result};
pub use pool::ThreadPool;
