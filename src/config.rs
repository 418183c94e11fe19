use std::thread;

use crate::monitor::WorkerId;

/// Configuration applied uniformly to every worker thread the pool spawns.
///
/// The pool stores its own clone at creation time, so the caller's copy can
/// be dropped afterwards. Settings map onto [`std::thread::Builder`].
#[derive(Debug, Clone)]
pub struct ThreadConfig {
    name_prefix: String,
    stack_size: Option<usize>,
}

impl Default for ThreadConfig {
    fn default() -> Self {
        ThreadConfig {
            name_prefix: "pool-worker".to_string(),
            stack_size: None,
        }
    }
}

impl ThreadConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the name prefix for worker threads.
    ///
    /// Each worker is named `<prefix>-<id>`, where the id is unique for the
    /// lifetime of the pool.
    pub fn name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.name_prefix = prefix.into();
        self
    }

    /// Sets the stack size in bytes for each worker thread.
    ///
    /// If unset, the platform default is used.
    pub fn stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = Some(bytes);
        self
    }

    /// Builds the `thread::Builder` for the worker with the given id.
    pub(crate) fn thread_builder(&self, id: WorkerId) -> thread::Builder {
        let mut builder = thread::Builder::new().name(format!("{}-{id}", self.name_prefix));
        if let Some(bytes) = self.stack_size {
            builder = builder.stack_size(bytes);
        }
        builder
    }
}
