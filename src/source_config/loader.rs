use std::path::PathBuf;

use config::Config;
use config::File;
use config::FileFormat;
#[cfg(test)]
use mockall::automock;
use tracing::debug;

use crate::ConfigSnapshot;
use crate::Result;
use crate::SourceConfigError;
use crate::SourcesConfig;

/// Produces the source declarations once at startup.
#[cfg_attr(test, automock)]
pub trait SourceConfigLoader: Send + Sync {
    fn load(&self) -> Result<ConfigSnapshot>;
}

/// An already built snapshot is its own loader.
impl SourceConfigLoader for ConfigSnapshot {
    fn load(&self) -> Result<ConfigSnapshot> {
        self.validate()?;
        Ok(self.clone())
    }
}

/// Reads `[[sources]]` tables from a TOML file.
///
/// ```toml
/// [[sources]]
/// id = "lock_screen"
/// kind = "dynamic"
/// profile = "primary_only"
/// title = "Screen lock"
/// ```
#[derive(Debug, Clone)]
pub struct FileSourceConfigLoader {
    path: PathBuf,
}

impl FileSourceConfigLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_settings(settings: &SourcesConfig) -> Result<Self> {
        settings
            .path
            .clone()
            .map(Self::new)
            .ok_or_else(|| SourceConfigError::MissingPath.into())
    }
}

impl SourceConfigLoader for FileSourceConfigLoader {
    fn load(&self) -> Result<ConfigSnapshot> {
        debug!(path = %self.path.display(), "loading source configuration");

        let snapshot: ConfigSnapshot = Config::builder()
            .add_source(File::from(self.path.as_path()).format(FileFormat::Toml))
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(SourceConfigError::Parse)?;

        snapshot.validate()?;
        Ok(snapshot)
    }
}
