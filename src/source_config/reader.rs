use std::sync::Arc;

use tracing::error;
use tracing::info;
use tracing::warn;

use crate::ConfigSnapshot;
use crate::Error;
use crate::Result;
use crate::SourceConfigLoader;

/// Holds the loaded snapshot plus an optional test override. Lives under the
/// state lock.
///
/// Loading happens once per reader. A failed load leaves it empty for good,
/// and no override can be installed on top of it.
#[derive(Debug, Default)]
pub(crate) struct ConfigReader {
    load_attempted: bool,
    loaded: Option<Arc<ConfigSnapshot>>,
    override_for_tests: Option<Arc<ConfigSnapshot>>,
}

impl ConfigReader {
    /// Returns whether a snapshot is available. A failure is logged and
    /// leaves the reader empty; later calls return the first outcome without
    /// touching `loader`.
    pub(crate) fn load_config(
        &mut self,
        loader: &dyn SourceConfigLoader,
    ) -> bool {
        if self.load_attempted {
            warn!(loaded = self.loaded.is_some(), "source configuration already loaded once, ignoring");
            return self.loaded.is_some();
        }
        self.load_attempted = true;

        match loader.load() {
            Ok(snapshot) => {
                info!(sources = snapshot.sources().len(), "source configuration loaded");
                self.loaded = Some(Arc::new(snapshot));
                true
            }
            Err(e) => {
                error!("failed to load source configuration: {:?}", e);
                false
            }
        }
    }

    /// The override if one is set, else the loaded snapshot, else an empty one
    pub(crate) fn current(&self) -> Arc<ConfigSnapshot> {
        self.override_for_tests
            .as_ref()
            .or(self.loaded.as_ref())
            .cloned()
            .unwrap_or_default()
    }

    pub(crate) fn has_config(&self) -> bool {
        self.override_for_tests.is_some() || self.loaded.is_some()
    }

    pub(crate) fn set_override(
        &mut self,
        snapshot: ConfigSnapshot,
    ) -> Result<()> {
        self.ensure_loaded()?;
        self.override_for_tests = Some(Arc::new(snapshot));
        Ok(())
    }

    pub(crate) fn clear_override(&mut self) -> Result<()> {
        self.ensure_loaded()?;
        self.override_for_tests = None;
        Ok(())
    }

    fn ensure_loaded(&self) -> Result<()> {
        if self.loaded.is_none() {
            return Err(Error::Unavailable("no source configuration loaded".to_string()));
        }
        Ok(())
    }
}
