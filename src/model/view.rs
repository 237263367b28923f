use serde::Deserialize;
use serde::Serialize;

use crate::ActionId;
use crate::IssueId;
use crate::Severity;
use crate::SourceId;
use crate::UserId;

/// Severity of the whole profile group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallSeverity {
    /// Nothing has been reported yet
    #[default]
    Unknown,
    Ok,
    Recommendation,
    CriticalWarning,
}

impl From<Severity> for OverallSeverity {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Unspecified | Severity::Information => OverallSeverity::Ok,
            Severity::Recommendation => OverallSeverity::Recommendation,
            Severity::CriticalWarning => OverallSeverity::CriticalWarning,
        }
    }
}

/// One (source, user) contribution to the view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceEntry {
    pub source_id: SourceId,
    pub user_id: UserId,
    pub title: String,
    pub summary: String,
    pub severity: Severity,
    /// The source reported a failure since its last report
    pub in_error: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionView {
    pub id: ActionId,
    pub label: String,
    pub will_resolve: bool,
    pub in_flight: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueView {
    pub id: IssueId,
    pub title: String,
    pub summary: String,
    pub severity: Severity,
    pub actions: Vec<ActionView>,
}

/// Merged projection over every report of a profile group. Recomputed on each
/// read; never cached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateView {
    pub severity: OverallSeverity,
    pub sources: Vec<SourceEntry>,
    pub issues: Vec<IssueView>,
}

impl AggregateView {
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty() && self.issues.is_empty()
    }

    pub fn issue(
        &self,
        id: &IssueId,
    ) -> Option<&IssueView> {
        self.issues.iter().find(|i| &i.id == id)
    }
}
