use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::error;
use tracing::warn;

use crate::DispatchError;
use crate::Result;

/// Awaits `task` for at most `duration`.
///
/// An elapsed deadline is reported as [`DispatchError::Timeout`] against
/// `target`; the task's own error is passed through untouched.
pub(crate) async fn call_with_timeout<T, F>(
    target: &str,
    duration: Duration,
    task: F,
) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match timeout(duration, task).await {
        Ok(result) => result,
        Err(_) => {
            warn!(%target, ?duration, "call timed out");
            Err(DispatchError::Timeout {
                target: target.to_string(),
                duration,
            }
            .into())
        }
    }
}

/// Spawns a named background task and logs how it ended.
pub(crate) fn spawn_task<F, Fut>(
    name: &str,
    task_fn: F,
) -> JoinHandle<()>
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    let name = name.to_string();
    tokio::spawn(async move {
        if let Err(e) = task_fn().await {
            error!("spawned task: {name} stopped or encountered an error: {:?}", e);
        }
    })
}
