#[cfg(test)]
use mockall::automock;
use async_trait::async_trait;

use crate::Dispatchable;
use crate::Result;
use crate::UserId;

/// Performs opaque dispatchables (resolving actions, dismissal callbacks)
/// on behalf of `user`.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DispatchSink: Send + Sync + 'static {
    async fn dispatch(
        &self,
        target: &Dispatchable,
        user: UserId,
    ) -> Result<()>;
}
