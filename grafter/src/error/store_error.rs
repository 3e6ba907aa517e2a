//! Observable state container errors.

use thiserror::Error;

/// Errors from constructing a [`Store`](crate::Store).
#[derive(Debug, Error)]
pub enum StoreError {
    /// The notification delivery thread could not be started.
    #[error("failed to spawn notification thread: {0}")]
    Spawn(#[source] std::io::Error),
}
