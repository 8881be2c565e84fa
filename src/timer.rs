//! Cancellable tasks that run once after a delay.

use std::{future::Future, time::Duration};

use tokio::task::JoinHandle;

/// How long the payment confirmation stays on screen before it is dismissed.
pub const CONFIRMATION_DISMISS_DELAY: Duration = Duration::from_secs(10);

/// A task scheduled to run once after a delay.
///
/// Dropping the handle cancels the task, so a screen that has already been
/// closed cannot be touched by a callback that fires late.
#[derive(Debug)]
pub struct DeferredTask {
    handle: JoinHandle<()>,
}

impl DeferredTask {
    /// Run `task` after `delay` on the current tokio runtime.
    ///
    /// # Panics
    /// Panics if called outside of a tokio runtime.
    pub fn spawn<F>(delay: Duration, task: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        });

        Self { handle }
    }

    /// Stop the task if it has not run yet.
    pub fn cancel(&self) {
        if !self.handle.is_finished() {
            tracing::debug!("Cancelling deferred task");
        }

        self.handle.abort();
    }

    /// Whether the task has run or been cancelled.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait until the task has run or been cancelled.
    pub async fn finished(&mut self) {
        // A cancelled task resolves to a `JoinError`, which is still finished.
        let _ = (&mut self.handle).await;
    }
}

impl Drop for DeferredTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
