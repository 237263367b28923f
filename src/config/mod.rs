//! Runtime settings for the safety broker.
//!
//! Settings are layered from multiple sources with priority:
//! 1. Default values (hardcoded)
//! 2. Explicit override file passed to [`Settings::load`]
//! 3. File named by the `CONFIG_PATH` environment variable
//! 4. `SAFETY_BROKER__*` environment variables (highest priority)
//!
//! Source declarations are not part of these settings, see
//! [`crate::source_config`].

mod broadcast;
mod delivery;
mod sources;
pub use broadcast::*;
pub use delivery::*;
pub use sources::*;


//---
use std::env;

use config::Config;
use config::Environment;
use config::File;
use serde::Deserialize;
use serde::Serialize;

use crate::constants::CONFIG_PATH_ENV;
use crate::constants::ENV_PREFIX;
use crate::constants::ENV_SEPARATOR;
use crate::Result;

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Settings {
    /// Refresh and enabled-state broadcasts to sources
    #[serde(default)]
    pub broadcast: BroadcastConfig,
    /// Observer delivery and action dispatch
    #[serde(default)]
    pub delivery: DeliveryConfig,
    /// Where source declarations are read from
    #[serde(default)]
    pub sources: SourcesConfig,
}

impl Settings {
    /// Load settings with proper priority ordering
    ///
    /// # Arguments
    /// * `override_path` - Optional settings file applied on top of the defaults
    pub fn load(override_path: Option<&str>) -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Settings::default())?);

        if let Some(path) = override_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        if let Ok(path) = env::var(CONFIG_PATH_ENV) {
            builder = builder.add_source(File::with_name(&path));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator(ENV_SEPARATOR)
                .ignore_empty(true)
                .try_parsing(true),
        );

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        self.broadcast.validate()?;
        self.delivery.validate()?;
        Ok(())
    }
}
