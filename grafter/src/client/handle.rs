//! Handles to in-flight operations.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::result::GateControl;

/// A handle to an operation started with
/// [`RemoteClient::execute`](crate::RemoteClient::execute).
///
/// Dropping the handle detaches the operation; it keeps running and still
/// reports its result.
#[derive(Debug)]
pub struct OperationHandle {
    control: Arc<GateControl>,
    task: Option<JoinHandle<()>>,
}

impl OperationHandle {
    pub(crate) fn spawned(control: Arc<GateControl>, task: JoinHandle<()>) -> Self {
        Self {
            control,
            task: Some(task),
        }
    }

    /// A handle for an operation that finished before any task was spawned.
    pub(crate) fn completed(control: Arc<GateControl>) -> Self {
        Self { control, task: None }
    }

    /// Cancels the operation.
    ///
    /// Once this returns the result callback is not running and never runs
    /// again: a cancelled operation reports nothing, not even a failure.
    pub fn cancel(&self) {
        if self.control.cancel() {
            debug!("operation cancelled");
        }
        if let Some(task) = &self.task {
            task.abort();
        }
    }

    /// Returns `true` once a terminal result was delivered or the operation
    /// was cancelled.
    pub fn is_finished(&self) -> bool {
        self.control.is_closed()
    }

    /// Waits until the operation task has exited.
    pub async fn wait(self) {
        if let Some(task) = self.task {
            // A cancelled task reports a JoinError; there is nothing to surface.
            let _ = task.await;
        }
    }
}
