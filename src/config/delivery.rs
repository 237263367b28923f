use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

use crate::constants::DEFAULT_ACTION_TIMEOUT_IN_MS;
use crate::constants::DEFAULT_OBSERVER_TIMEOUT_IN_MS;
use crate::Error;
use crate::Result;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DeliveryConfig {
    /// Per observer upper bound for delivering one aggregate view
    #[serde(default = "default_observer_timeout")]
    pub observer_timeout_in_ms: u64,

    /// Upper bound for handing a dispatchable to the dispatch sink
    #[serde(default = "default_action_timeout")]
    pub action_timeout_in_ms: u64,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            observer_timeout_in_ms: default_observer_timeout(),
            action_timeout_in_ms: default_action_timeout(),
        }
    }
}

impl DeliveryConfig {
    pub fn validate(&self) -> Result<()> {
        if self.observer_timeout_in_ms == 0 {
            return Err(Error::InvalidSettings(
                "delivery.observer_timeout_in_ms must be greater than 0".into(),
            ));
        }
        if self.action_timeout_in_ms == 0 {
            return Err(Error::InvalidSettings(
                "delivery.action_timeout_in_ms must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    pub fn observer_timeout(&self) -> Duration {
        Duration::from_millis(self.observer_timeout_in_ms)
    }

    pub fn action_timeout(&self) -> Duration {
        Duration::from_millis(self.action_timeout_in_ms)
    }
}

fn default_observer_timeout() -> u64 {
    DEFAULT_OBSERVER_TIMEOUT_IN_MS
}

fn default_action_timeout() -> u64 {
    DEFAULT_ACTION_TIMEOUT_IN_MS
}
