use std::collections::HashSet;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::CallerError;
use crate::Result;
use crate::SourceId;

/// Severity a source attaches to its status or to one of its issues.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    #[default]
    Unspecified,
    Information,
    Recommendation,
    CriticalWarning,
}

/// Opaque reference handed to the dispatch sink (a deep link, an intent, a
/// callback token). The broker never interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dispatchable(String);

impl Dispatchable {
    pub fn new(target: impl Into<String>) -> Self {
        Self(target.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Dispatchable {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceStatus {
    pub title: String,
    pub summary: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub key: String,
    pub label: String,
    /// Executing a resolving action is expected to close the issue; it is
    /// marked in flight until the source supersedes its report.
    pub will_resolve: bool,
    pub target: Dispatchable,
}

impl Action {
    pub fn resolving(
        key: impl Into<String>,
        target: Dispatchable,
    ) -> Self {
        Self {
            key: key.into(),
            label: String::new(),
            will_resolve: true,
            target,
        }
    }

    pub fn informational(
        key: impl Into<String>,
        target: Dispatchable,
    ) -> Self {
        Self {
            key: key.into(),
            label: String::new(),
            will_resolve: false,
            target,
        }
    }

    pub fn with_label(
        mut self,
        label: impl Into<String>,
    ) -> Self {
        self.label = label.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub key: String,
    pub issue_type_id: String,
    pub title: String,
    pub summary: String,
    pub severity: Severity,
    pub actions: Vec<Action>,
    /// Sent through the dispatch sink once the user dismisses the issue
    pub on_dismiss: Option<Dispatchable>,
}

impl Issue {
    pub fn new(
        key: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            key: key.into(),
            issue_type_id: String::new(),
            title: String::new(),
            summary: String::new(),
            severity,
            actions: Vec::new(),
            on_dismiss: None,
        }
    }

    pub fn with_type(
        mut self,
        issue_type_id: impl Into<String>,
    ) -> Self {
        self.issue_type_id = issue_type_id.into();
        self
    }

    pub fn with_title(
        mut self,
        title: impl Into<String>,
        summary: impl Into<String>,
    ) -> Self {
        self.title = title.into();
        self.summary = summary.into();
        self
    }

    pub fn with_action(
        mut self,
        action: Action,
    ) -> Self {
        self.actions.push(action);
        self
    }

    pub fn with_on_dismiss(
        mut self,
        target: Dispatchable,
    ) -> Self {
        self.on_dismiss = Some(target);
        self
    }

    pub fn action(
        &self,
        key: &str,
    ) -> Option<&Action> {
        self.actions.iter().find(|a| a.key == key)
    }
}

/// A source's complete statement about one user. A newer report from the
/// same (source, user) replaces this one entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Source chosen token; issues of reports with different sessions never
    /// share identity
    pub session: String,
    pub status: Option<SourceStatus>,
    pub issues: Vec<Issue>,
}

impl Report {
    pub fn new(session: impl Into<String>) -> Self {
        Self {
            session: session.into(),
            status: None,
            issues: Vec::new(),
        }
    }

    pub fn with_status(
        mut self,
        title: impl Into<String>,
        summary: impl Into<String>,
        severity: Severity,
    ) -> Self {
        self.status = Some(SourceStatus {
            title: title.into(),
            summary: summary.into(),
            severity,
        });
        self
    }

    pub fn with_issue(
        mut self,
        issue: Issue,
    ) -> Self {
        self.issues.push(issue);
        self
    }

    /// Nothing to report: no status and no issues
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.issues.is_empty()
    }

    pub fn issue(
        &self,
        key: &str,
    ) -> Option<&Issue> {
        self.issues.iter().find(|i| i.key == key)
    }

    pub(crate) fn validate(
        &self,
        source_id: &SourceId,
    ) -> Result<()> {
        let invalid = |reason: String| CallerError::InvalidReport {
            source_id: source_id.clone(),
            reason,
        };

        let mut issue_keys = HashSet::new();
        for issue in &self.issues {
            if issue.key.is_empty() {
                return Err(invalid("issue key must not be empty".into()).into());
            }
            if !issue_keys.insert(issue.key.as_str()) {
                return Err(invalid(format!("duplicate issue key {}", issue.key)).into());
            }

            let mut action_keys = HashSet::new();
            for action in &issue.actions {
                if action.key.is_empty() {
                    return Err(invalid(format!("issue {} has an action with an empty key", issue.key)).into());
                }
                if !action_keys.insert(action.key.as_str()) {
                    return Err(invalid(format!(
                        "duplicate action key {} in issue {}",
                        action.key, issue.key
                    ))
                    .into());
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SafetyEventKind {
    SourceStateChanged,
    RefreshRequested,
    ResolvingActionSucceeded,
    ResolvingActionFailed,
    DeviceLocaleChanged,
    DeviceRebooted,
}

/// Why a source pushed a report or an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyEvent {
    pub kind: SafetyEventKind,
    /// Echo of the id carried by the refresh request this event answers
    pub refresh_broadcast_id: Option<String>,
}

impl SafetyEvent {
    pub fn new(kind: SafetyEventKind) -> Self {
        Self {
            kind,
            refresh_broadcast_id: None,
        }
    }

    pub fn refresh(broadcast_id: impl Into<String>) -> Self {
        Self {
            kind: SafetyEventKind::RefreshRequested,
            refresh_broadcast_id: Some(broadcast_id.into()),
        }
    }
}

/// Failure a source reports instead of data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceErrorDetails {
    pub event: SafetyEvent,
}

/// User facing error delivered alongside an aggregate view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshReason {
    PageOpen,
    RescanButtonClick,
    DeviceReboot,
    DeviceLocaleChange,
    SafetyCenterEnabled,
    Other,
}
