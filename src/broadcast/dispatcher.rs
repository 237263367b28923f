use std::sync::Arc;
use std::time::Duration;

use nanoid::nanoid;
use tracing::debug;
use tracing::info;
use tracing::warn;

use super::SourceBroadcaster;
use crate::constants::DISPATCH_KIND_ENABLED_CHANGED;
use crate::constants::DISPATCH_KIND_REFRESH;
use crate::metrics::DISPATCH_FAILURES;
use crate::utils::async_task::call_with_timeout;
use crate::BroadcastConfig;
use crate::ConfigSnapshot;
use crate::ProfileGroup;
use crate::RefreshReason;

/// Counts of one sequential broadcast round
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastOutcome {
    pub sent: usize,
    pub failed: usize,
}

/// Sequential dispatcher of source broadcasts.
///
/// Each call blocks until the source answers or `timeout` elapses before
/// the next source is contacted.
pub struct BroadcastDispatcher {
    broadcaster: Arc<dyn SourceBroadcaster>,
    timeout: Duration,
}

impl std::fmt::Debug for BroadcastDispatcher {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("BroadcastDispatcher").field("timeout", &self.timeout).finish()
    }
}

impl BroadcastDispatcher {
    pub fn new(
        broadcaster: Arc<dyn SourceBroadcaster>,
        config: &BroadcastConfig,
    ) -> Self {
        Self {
            broadcaster,
            timeout: config.source_timeout(),
        }
    }

    /// Requests a refresh from every (source, user) pair of `group` the
    /// config puts in scope, in config order then primary first.
    ///
    /// Returns the broadcast id handed to the sources along with the outcome.
    pub async fn send_refresh(
        &self,
        config: &ConfigSnapshot,
        reason: RefreshReason,
        group: &ProfileGroup,
    ) -> (String, BroadcastOutcome) {
        let broadcast_id = nanoid!();
        let mut outcome = BroadcastOutcome::default();

        for source in config.reporting_sources() {
            for user in group.users().filter(|user| source.is_in_scope(*user, group)) {
                let target = format!("{}/{}", source.id, user);
                let result = call_with_timeout(
                    &target,
                    self.timeout,
                    self.broadcaster
                        .request_refresh(&source.id, user, reason, &broadcast_id),
                )
                .await;

                match result {
                    Ok(()) => outcome.sent += 1,
                    Err(e) => {
                        warn!(source_id = %source.id, %user, %broadcast_id, error = %e, "refresh request failed");
                        DISPATCH_FAILURES.with_label_values(&[DISPATCH_KIND_REFRESH]).inc();
                        outcome.failed += 1;
                    }
                }
            }
        }

        debug!(%broadcast_id, ?reason, group = %group, ?outcome, "refresh broadcast done");
        (broadcast_id, outcome)
    }

    /// Tells every declared source whether the hub is now enabled.
    pub async fn send_enabled_changed(
        &self,
        config: &ConfigSnapshot,
        enabled: bool,
    ) -> BroadcastOutcome {
        let mut outcome = BroadcastOutcome::default();

        for source in config.sources() {
            let result = call_with_timeout(
                source.id.as_str(),
                self.timeout,
                self.broadcaster.notify_enabled_changed(&source.id, enabled),
            )
            .await;

            match result {
                Ok(()) => outcome.sent += 1,
                Err(e) => {
                    warn!(source_id = %source.id, enabled, error = %e, "enabled change notification failed");
                    DISPATCH_FAILURES
                        .with_label_values(&[DISPATCH_KIND_ENABLED_CHANGED])
                        .inc();
                    outcome.failed += 1;
                }
            }
        }

        info!(enabled, ?outcome, "broadcast enabled state to sources");
        outcome
    }
}
