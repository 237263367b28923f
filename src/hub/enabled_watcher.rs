//! Two-state machine driven by the process-wide feature toggle.
//!
//! - Disabled -> Enabled: sources are told; nothing is cleared.
//! - Enabled -> Disabled: tracked data and observer registrations of every
//!   user are dropped under the state lock, then sources are told.
//!
//! Repeated notifications of the current value are coalesced into no-ops,
//! except for the value applied at boot which always reaches the sources.

use tokio::sync::watch;
use tracing::debug;
use tracing::info;

use super::SafetyHub;
use crate::ConfigSnapshot;
use crate::Result;

pub struct EnabledStateWatcher {
    hub: SafetyHub,
}

impl EnabledStateWatcher {
    pub fn new(hub: SafetyHub) -> Self {
        Self { hub }
    }

    /// Applies one toggle value. Returns whether a transition happened.
    pub async fn on_enabled_changed(
        &self,
        enabled: bool,
    ) -> bool {
        let Some(config) = self.hub.transition_enabled(enabled, false) else {
            debug!(enabled, "enabled state unchanged");
            return false;
        };
        info!(enabled, "safety hub enabled state changed");

        self.broadcast(&config, enabled).await;
        true
    }

    /// Applies the toggle value seen at boot. Sources are always told, even
    /// when the hub was built with the same value; disabling still clears.
    pub async fn apply_initial(
        &self,
        enabled: bool,
    ) {
        if let Some(config) = self.hub.transition_enabled(enabled, true) {
            info!(enabled, "safety hub initial enabled state applied");
            self.broadcast(&config, enabled).await;
        }
    }

    async fn broadcast(
        &self,
        config: &ConfigSnapshot,
        enabled: bool,
    ) {
        let dispatcher = self.hub.inner.broadcast.lock().await;
        dispatcher.send_enabled_changed(config, enabled).await;
    }

    /// Follows `toggle` until `shutdown` fires or the toggle's sender is
    /// dropped. The toggle's current value is applied first, see
    /// [`EnabledStateWatcher::apply_initial`].
    pub async fn run(
        self,
        mut toggle: watch::Receiver<bool>,
        mut shutdown: watch::Receiver<()>,
    ) -> Result<()> {
        let initial = *toggle.borrow_and_update();
        self.apply_initial(initial).await;

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    info!("enabled state watcher shutting down");
                    break;
                }
                changed = toggle.changed() => {
                    if changed.is_err() {
                        debug!("enabled toggle closed");
                        break;
                    }
                    let enabled = *toggle.borrow_and_update();
                    self.on_enabled_changed(enabled).await;
                }
            }
        }
        Ok(())
    }
}
