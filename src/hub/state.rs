use std::sync::Arc;

use crate::source_config::ConfigReader;
use crate::AggregateView;
use crate::ConfigSnapshot;
use crate::DataTracker;
use crate::ListenerRegistry;
use crate::Observer;
use crate::ProfileGroup;

/// Everything guarded by the state lock
#[derive(Debug, Default)]
pub(super) struct HubState {
    pub(super) config_reader: ConfigReader,
    pub(super) tracker: DataTracker,
    pub(super) listeners: ListenerRegistry,
}

/// A view and the observers it must reach, captured in one critical section
pub(super) struct Delivery {
    pub(super) view: AggregateView,
    pub(super) observers: Vec<Arc<dyn Observer>>,
}

impl HubState {
    pub(super) fn config(&self) -> Arc<ConfigSnapshot> {
        self.config_reader.current()
    }

    pub(super) fn delivery_for(
        &self,
        group: &ProfileGroup,
    ) -> Delivery {
        let config = self.config();
        Delivery {
            view: self.tracker.get_aggregate(&config, group),
            observers: self.listeners.for_profile_group(group),
        }
    }

    /// Drops tracked data and registrations of every user.
    pub(super) fn clear(&mut self) {
        self.tracker.clear();
        self.listeners.clear();
    }
}
