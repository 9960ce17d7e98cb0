//! Work scheduled to run once after a delay.

use std::time::Duration;

use thiserror::Error;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time;

/// Returned by [`Deferred::spawn`] when called outside a tokio runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no async runtime to schedule on")]
pub struct NoRuntime;

/// Handle to a task that runs after a fixed delay.
///
/// Dropping the handle cancels the task if it has not run yet.
#[derive(Debug)]
pub struct Deferred<T> {
    handle: Option<JoinHandle<T>>,
}

impl<T: Send + 'static> Deferred<T> {
    pub fn spawn<F>(delay: Duration, task: F) -> Result<Self, NoRuntime>
    where
        F: FnOnce() -> T + Send + 'static,
    {
        let runtime = Handle::try_current().map_err(|_| NoRuntime)?;
        let handle = runtime.spawn(async move {
            time::sleep(delay).await;
            task()
        });
        Ok(Self {
            handle: Some(handle),
        })
    }

    pub fn cancel(mut self) {
        self.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Wait for the task. `None` if it was cancelled or panicked.
    pub async fn join(mut self) -> Option<T> {
        let handle = self.handle.take()?;
        handle.await.ok()
    }
}

impl<T> Deferred<T> {
    fn abort(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl<T> Drop for Deferred<T> {
    fn drop(&mut self) {
        self.abort();
    }
}
