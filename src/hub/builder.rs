//! Assembles a [`SafetyHub`] from its external collaborators.
//!
//! ## Example
//! ```ignore
//! let hub = SafetyHubBuilder::new(resolver, broadcaster, dispatch_sink)
//!     .settings(Settings::load(None)?)
//!     .enabled(true)
//!     .build();
//! hub.start(&FileSourceConfigLoader::from_settings(&hub.settings().sources)?);
//! let watcher = hub.spawn_enabled_watcher(toggle_rx, shutdown_rx);
//! ```

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::info;

use super::safety_hub::HubInner;
use super::state::HubState;
use super::DispatchSink;
use super::SafetyHub;
use crate::BroadcastDispatcher;
use crate::ProfileGroupResolver;
use crate::Result;
use crate::Settings;
use crate::SourceBroadcaster;

pub struct SafetyHubBuilder {
    resolver: Arc<dyn ProfileGroupResolver>,
    broadcaster: Arc<dyn SourceBroadcaster>,
    dispatch_sink: Arc<dyn DispatchSink>,
    settings: Option<Settings>,
    enabled: bool,
}

impl SafetyHubBuilder {
    pub fn new(
        resolver: Arc<dyn ProfileGroupResolver>,
        broadcaster: Arc<dyn SourceBroadcaster>,
        dispatch_sink: Arc<dyn DispatchSink>,
    ) -> Self {
        Self {
            resolver,
            broadcaster,
            dispatch_sink,
            settings: None,
            enabled: true,
        }
    }

    pub fn settings(
        mut self,
        settings: Settings,
    ) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Loads settings through [`Settings::load`], layering `override_path`
    /// and the environment on top of the defaults.
    pub fn load_settings(
        self,
        override_path: Option<&str>,
    ) -> Result<Self> {
        let settings = Settings::load(override_path)?;
        Ok(self.settings(settings))
    }

    /// Initial value of the feature toggle
    pub fn enabled(
        mut self,
        enabled: bool,
    ) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn build(self) -> SafetyHub {
        let settings = Arc::new(self.settings.unwrap_or_default());
        let dispatcher = BroadcastDispatcher::new(self.broadcaster, &settings.broadcast);

        info!(enabled = self.enabled, ?settings, "safety hub built");
        SafetyHub {
            inner: Arc::new(HubInner {
                state: Mutex::new(HubState::default()),
                broadcast: tokio::sync::Mutex::new(dispatcher),
                enabled: AtomicBool::new(self.enabled),
                resolver: self.resolver,
                dispatch_sink: self.dispatch_sink,
                settings,
            }),
        }
    }
}
