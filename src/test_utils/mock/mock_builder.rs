use std::sync::Arc;

use crate::test_utils::other_group;
use crate::test_utils::primary_group;
use crate::test_utils::test_config;
use crate::BroadcastConfig;
use crate::ConfigSnapshot;
use crate::DeliveryConfig;
use crate::MockDispatchSink;
use crate::MockSourceBroadcaster;
use crate::ProfileGroupResolver;
use crate::SafetyHub;
use crate::SafetyHubBuilder;
use crate::Settings;
use crate::StaticProfileGroups;

pub struct MockHubBuilder {
    pub broadcaster: Option<MockSourceBroadcaster>,
    pub dispatch_sink: Option<MockDispatchSink>,
    pub resolver: Option<Arc<dyn ProfileGroupResolver>>,
    pub settings: Option<Settings>,
    pub config: Option<ConfigSnapshot>,
    pub enabled: bool,
}

impl Default for MockHubBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MockHubBuilder {
    pub fn new() -> Self {
        Self {
            broadcaster: None,
            dispatch_sink: None,
            resolver: None,
            settings: None,
            config: Some(test_config()),
            enabled: true,
        }
    }

    pub fn with_broadcaster(
        mut self,
        broadcaster: MockSourceBroadcaster,
    ) -> Self {
        self.broadcaster = Some(broadcaster);
        self
    }

    pub fn with_dispatch_sink(
        mut self,
        dispatch_sink: MockDispatchSink,
    ) -> Self {
        self.dispatch_sink = Some(dispatch_sink);
        self
    }

    /// `None` leaves the hub without any source configuration
    pub fn with_config(
        mut self,
        config: Option<ConfigSnapshot>,
    ) -> Self {
        self.config = config;
        self
    }

    pub fn with_enabled(
        mut self,
        enabled: bool,
    ) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn build_hub(self) -> SafetyHub {
        let resolver = self
            .resolver
            .unwrap_or_else(|| Arc::new(StaticProfileGroups::new([primary_group(), other_group()])));
        let settings = self.settings.unwrap_or_else(|| Settings {
            broadcast: BroadcastConfig {
                source_timeout_in_ms: 100,
            },
            delivery: DeliveryConfig {
                observer_timeout_in_ms: 100,
                action_timeout_in_ms: 100,
            },
            ..Default::default()
        });

        let hub = SafetyHubBuilder::new(
            resolver,
            Arc::new(self.broadcaster.unwrap_or_default()),
            Arc::new(self.dispatch_sink.unwrap_or_default()),
        )
        .settings(settings)
        .enabled(self.enabled)
        .build();

        if let Some(config) = self.config {
            assert!(hub.start(&config));
        }
        hub
    }
}
