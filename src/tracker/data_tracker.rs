use std::collections::HashMap;
use std::collections::HashSet;

use tracing::debug;
use tracing::trace;
use tracing::warn;

use super::aggregate;
use crate::constants::REFRESH_ERROR_MESSAGE;
use crate::constants::RESOLVING_ACTION_ERROR_MESSAGE;
use crate::metrics::ACTIONS_IN_FLIGHT;
use crate::metrics::ISSUES_DISMISSED;
use crate::metrics::REPORTS_RECEIVED;
use crate::Action;
use crate::ActionId;
use crate::AggregateView;
use crate::CallerError;
use crate::ConfigSnapshot;
use crate::ErrorDetails;
use crate::Issue;
use crate::IssueId;
use crate::ProfileGroup;
use crate::Report;
use crate::Result;
use crate::SafetyEvent;
use crate::SafetyEventKind;
use crate::SourceConfig;
use crate::SourceErrorDetails;
use crate::SourceId;
use crate::UserId;

/// Storage key of one source's contribution for one user
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct SourceKey {
    pub(crate) source_id: SourceId,
    pub(crate) user_id: UserId,
}

impl SourceKey {
    pub(crate) fn new(
        source_id: SourceId,
        user_id: UserId,
    ) -> Self {
        Self { source_id, user_id }
    }

    fn of_issue(id: &IssueId) -> Self {
        Self::new(id.source_id.clone(), id.user_id)
    }
}

/// Outcome of [`DataTracker::record_source_error`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceErrorState {
    /// The source was not already flagged as failing
    pub changed: bool,
    /// Message to surface to observers, if the failure is user visible
    pub details: Option<ErrorDetails>,
}

#[derive(Debug, Default)]
pub struct DataTracker {
    pub(crate) reports: HashMap<SourceKey, Report>,
    pub(crate) errors: HashSet<SourceKey>,
    pub(crate) dismissed: HashSet<IssueId>,
    pub(crate) in_flight: HashSet<ActionId>,
}

impl DataTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores or replaces the report of (`source_id`, `user`).
    ///
    /// `None` or an empty report means the source has nothing to report and
    /// drops what was stored. Returns whether the tracked state changed.
    pub fn set_report(
        &mut self,
        config: &ConfigSnapshot,
        report: Option<Report>,
        source_id: &SourceId,
        event: SafetyEvent,
        user: UserId,
        group: &ProfileGroup,
    ) -> Result<bool> {
        Self::reporting_source(config, source_id, user, group)?;

        let report = report.filter(|r| !r.is_empty());
        if let Some(report) = &report {
            report.validate(source_id)?;
        }

        REPORTS_RECEIVED.with_label_values(&[source_id.as_str()]).inc();

        let key = SourceKey::new(source_id.clone(), user);
        let had_error = self.errors.remove(&key);

        let changed = match report {
            None => self.reports.remove(&key).is_some(),
            Some(report) => {
                let changed = self.reports.get(&key).map_or(true, |stored| stored != &report);
                self.reports.insert(key.clone(), report);
                changed
            }
        };

        if changed {
            self.prune_stale_markers(&key);
        }

        trace!(%source_id, %user, event = ?event.kind, changed, had_error, "set_report");
        Ok(changed || had_error)
    }

    pub fn get_report(
        &self,
        config: &ConfigSnapshot,
        source_id: &SourceId,
        user: UserId,
    ) -> Result<Option<Report>> {
        if config.source(source_id).is_none() {
            return Err(CallerError::UnknownSource(source_id.clone()).into());
        }
        Ok(self
            .reports
            .get(&SourceKey::new(source_id.clone(), user))
            .cloned())
    }

    /// Flags (`source_id`, `user`) as failing until its next report.
    pub fn record_source_error(
        &mut self,
        config: &ConfigSnapshot,
        source_id: &SourceId,
        error: &SourceErrorDetails,
        user: UserId,
        group: &ProfileGroup,
    ) -> Result<SourceErrorState> {
        Self::reporting_source(config, source_id, user, group)?;

        let changed = self.errors.insert(SourceKey::new(source_id.clone(), user));
        let details = match error.event.kind {
            SafetyEventKind::RefreshRequested => Some(REFRESH_ERROR_MESSAGE),
            SafetyEventKind::ResolvingActionFailed => Some(RESOLVING_ACTION_ERROR_MESSAGE),
            _ => None,
        }
        .map(|message| ErrorDetails {
            message: message.to_string(),
        });

        debug!(%source_id, %user, event = ?error.event.kind, changed, "source reported an error");
        Ok(SourceErrorState { changed, details })
    }

    /// Merged view over every report of `group`, see [`AggregateView`].
    pub fn get_aggregate(
        &self,
        config: &ConfigSnapshot,
        group: &ProfileGroup,
    ) -> AggregateView {
        aggregate::build_view(self, config, group)
    }

    /// The live, undismissed issue `id` refers to.
    pub fn find_issue(
        &self,
        id: &IssueId,
    ) -> Option<&Issue> {
        if self.dismissed.contains(id) {
            return None;
        }
        self.lookup_issue(id)
    }

    /// The live action `id` refers to. Resolving actions already in flight
    /// are not returned.
    pub fn find_action(
        &self,
        id: &ActionId,
    ) -> Option<&Action> {
        let action = self.find_issue(&id.issue_id)?.action(&id.action_key)?;
        if action.will_resolve && self.in_flight.contains(id) {
            return None;
        }
        Some(action)
    }

    /// Returns whether the issue was newly dismissed.
    pub fn dismiss(
        &mut self,
        id: &IssueId,
    ) -> bool {
        if self.find_issue(id).is_none() {
            warn!(issue_id = ?id, "dismiss: issue not provided by the source or already dismissed");
            return false;
        }
        ISSUES_DISMISSED.inc();
        self.dismissed.insert(id.clone())
    }

    /// Returns whether the resolving action was newly marked in flight.
    pub fn mark_in_flight(
        &mut self,
        id: &ActionId,
    ) -> bool {
        match self.find_action(id) {
            Some(action) if action.will_resolve => {
                ACTIONS_IN_FLIGHT.inc();
                self.in_flight.insert(id.clone())
            }
            Some(_) => {
                debug!(action_id = ?id, "mark_in_flight: action does not resolve its issue");
                false
            }
            None => {
                warn!(action_id = ?id, "mark_in_flight: action not found or already in flight");
                false
            }
        }
    }

    pub fn is_in_flight(
        &self,
        id: &ActionId,
    ) -> bool {
        self.in_flight.contains(id)
    }

    pub fn is_dismissed(
        &self,
        id: &IssueId,
    ) -> bool {
        self.dismissed.contains(id)
    }

    /// Drops every report, error flag, dismissal and in-flight marker.
    pub fn clear(&mut self) {
        ACTIONS_IN_FLIGHT.sub(self.in_flight.len() as i64);
        self.reports.clear();
        self.errors.clear();
        self.dismissed.clear();
        self.in_flight.clear();
    }

    fn reporting_source<'a>(
        config: &'a ConfigSnapshot,
        source_id: &SourceId,
        user: UserId,
        group: &ProfileGroup,
    ) -> Result<&'a SourceConfig> {
        let source = config
            .source(source_id)
            .ok_or_else(|| CallerError::UnknownSource(source_id.clone()))?;
        if source.is_static() {
            return Err(CallerError::StaticSource(source_id.clone()).into());
        }
        if !source.is_in_scope(user, group) {
            return Err(CallerError::SourceOutOfScope {
                source_id: source_id.clone(),
                user,
            }
            .into());
        }
        Ok(source)
    }

    /// Ignores dismissal state
    fn lookup_issue(
        &self,
        id: &IssueId,
    ) -> Option<&Issue> {
        let report = self.reports.get(&SourceKey::of_issue(id))?;
        if report.session != id.session {
            return None;
        }
        report
            .issue(&id.issue_key)
            .filter(|issue| issue.issue_type_id == id.issue_type_id)
    }

    /// Markers of `key` that no longer match a live issue can never match
    /// again; drop them so the side sets stay bounded.
    fn prune_stale_markers(
        &mut self,
        key: &SourceKey,
    ) {
        let dismissed: Vec<IssueId> = self
            .dismissed
            .iter()
            .filter(|id| &SourceKey::of_issue(id) == key && self.lookup_issue(id).is_none())
            .cloned()
            .collect();
        for id in dismissed {
            self.dismissed.remove(&id);
        }

        let in_flight: Vec<ActionId> = self
            .in_flight
            .iter()
            .filter(|id| {
                &SourceKey::of_issue(&id.issue_id) == key
                    && self
                        .lookup_issue(&id.issue_id)
                        .and_then(|issue| issue.action(&id.action_key))
                        .is_none()
            })
            .cloned()
            .collect();
        for id in in_flight {
            self.in_flight.remove(&id);
            ACTIONS_IN_FLIGHT.dec();
        }
    }
}
