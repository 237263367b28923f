use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

use crate::constants::DEFAULT_SOURCE_TIMEOUT_IN_MS;
use crate::Error;
use crate::Result;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BroadcastConfig {
    /// Upper bound for a single source call during a refresh or
    /// enabled-changed broadcast. A source that does not answer in time is
    /// logged and skipped; the loop moves on to the next source.
    #[serde(default = "default_source_timeout")]
    pub source_timeout_in_ms: u64,
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            source_timeout_in_ms: default_source_timeout(),
        }
    }
}

impl BroadcastConfig {
    pub fn validate(&self) -> Result<()> {
        if self.source_timeout_in_ms == 0 {
            return Err(Error::InvalidSettings(
                "broadcast.source_timeout_in_ms must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    pub fn source_timeout(&self) -> Duration {
        Duration::from_millis(self.source_timeout_in_ms)
    }
}

fn default_source_timeout() -> u64 {
    DEFAULT_SOURCE_TIMEOUT_IN_MS
}
