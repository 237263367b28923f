use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

/// Location of the source declarations read by
/// [`crate::FileSourceConfigLoader`].
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct SourcesConfig {
    #[serde(default)]
    pub path: Option<PathBuf>,
}
