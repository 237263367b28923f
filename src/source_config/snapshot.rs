use std::collections::HashSet;

use serde::Deserialize;
use serde::Serialize;

use crate::ProfileGroup;
use crate::Result;
use crate::SourceConfigError;
use crate::SourceId;
use crate::UserId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Display only; never reports and is never refreshed
    Static,
    /// Reports a status and issues
    #[default]
    Dynamic,
    /// Reports issues only; its status summary is ignored
    IssueOnly,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileScope {
    #[default]
    PrimaryOnly,
    AllProfiles,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub id: SourceId,

    #[serde(default)]
    pub kind: SourceKind,

    #[serde(default)]
    pub profile: ProfileScope,

    #[serde(default)]
    pub title: String,
}

impl SourceConfig {
    pub fn new(
        id: impl Into<SourceId>,
        kind: SourceKind,
        profile: ProfileScope,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            profile,
            title: String::new(),
        }
    }

    pub fn dynamic(id: impl Into<SourceId>) -> Self {
        Self::new(id, SourceKind::Dynamic, ProfileScope::PrimaryOnly)
    }

    pub fn with_title(
        mut self,
        title: impl Into<String>,
    ) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_profile(
        mut self,
        profile: ProfileScope,
    ) -> Self {
        self.profile = profile;
        self
    }

    pub fn is_static(&self) -> bool {
        self.kind == SourceKind::Static
    }

    /// Whether the source covers `user` within `group`
    pub fn is_in_scope(
        &self,
        user: UserId,
        group: &ProfileGroup,
    ) -> bool {
        match self.profile {
            ProfileScope::AllProfiles => group.contains(user),
            ProfileScope::PrimaryOnly => group.primary() == user,
        }
    }
}

/// Ordered, validated list of source declarations. Declaration order is the
/// order sources appear in aggregate views and receive broadcasts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    sources: Vec<SourceConfig>,
}

impl ConfigSnapshot {
    pub fn new(sources: Vec<SourceConfig>) -> Result<Self> {
        let snapshot = Self { sources };
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sources.is_empty() {
            return Err(SourceConfigError::NoSources.into());
        }

        let mut seen = HashSet::new();
        for source in &self.sources {
            if source.id.is_empty() {
                return Err(SourceConfigError::EmptySourceId.into());
            }
            if !seen.insert(&source.id) {
                return Err(SourceConfigError::DuplicateSourceId(source.id.clone()).into());
            }
        }
        Ok(())
    }

    pub fn sources(&self) -> &[SourceConfig] {
        &self.sources
    }

    pub fn source(
        &self,
        id: &SourceId,
    ) -> Option<&SourceConfig> {
        self.sources.iter().find(|s| &s.id == id)
    }

    /// Sources that can report and be refreshed
    pub fn reporting_sources(&self) -> impl Iterator<Item = &SourceConfig> + '_ {
        self.sources.iter().filter(|s| !s.is_static())
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
