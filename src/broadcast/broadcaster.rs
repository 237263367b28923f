#[cfg(test)]
use mockall::automock;
use async_trait::async_trait;

use crate::RefreshReason;
use crate::Result;
use crate::SourceId;
use crate::UserId;

/// Transport to the safety sources.
///
/// A source may synchronously call back into the hub (e.g. `set_report`)
/// before its call here returns.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SourceBroadcaster: Send + Sync + 'static {
    /// Asks `source_id` to re-report its data for `user`. The source echoes
    /// `broadcast_id` in the event of its answer.
    async fn request_refresh(
        &self,
        source_id: &SourceId,
        user: UserId,
        reason: RefreshReason,
        broadcast_id: &str,
    ) -> Result<()>;

    async fn notify_enabled_changed(
        &self,
        source_id: &SourceId,
        enabled: bool,
    ) -> Result<()>;
}
