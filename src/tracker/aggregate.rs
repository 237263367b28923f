//! Pure projection of tracked reports into an [`AggregateView`].
//!
//! Ordering: sources as declared in the config, users primary first, issues
//! as declared in their report; then a stable sort by severity (highest
//! first) so ties keep declaration order.

use std::collections::HashSet;

use super::data_tracker::SourceKey;
use super::DataTracker;
use crate::ActionId;
use crate::ActionView;
use crate::AggregateView;
use crate::ConfigSnapshot;
use crate::IssueId;
use crate::IssueView;
use crate::OverallSeverity;
use crate::ProfileGroup;
use crate::Severity;
use crate::SourceEntry;
use crate::SourceKind;

pub(super) fn build_view(
    tracker: &DataTracker,
    config: &ConfigSnapshot,
    group: &ProfileGroup,
) -> AggregateView {
    let mut severity = OverallSeverity::Unknown;
    let mut has_report = false;
    let mut sources = Vec::new();
    let mut issues = Vec::new();
    let mut seen = HashSet::new();

    for source in config.reporting_sources() {
        for user in group.users() {
            if !source.is_in_scope(user, group) {
                continue;
            }

            let key = SourceKey::new(source.id.clone(), user);
            let report = tracker.reports.get(&key);
            let in_error = tracker.errors.contains(&key);

            let status = report
                .and_then(|r| r.status.as_ref())
                .filter(|_| source.kind != SourceKind::IssueOnly);
            if status.is_some() || in_error {
                let (title, summary, entry_severity) = match status {
                    Some(s) => (s.title.clone(), s.summary.clone(), s.severity),
                    None => (source.title.clone(), String::new(), Severity::Unspecified),
                };
                if let Some(s) = status {
                    severity = severity.max(s.severity.into());
                }
                sources.push(SourceEntry {
                    source_id: source.id.clone(),
                    user_id: user,
                    title,
                    summary,
                    severity: entry_severity,
                    in_error,
                });
            }

            let Some(report) = report else {
                continue;
            };
            has_report = true;

            for issue in &report.issues {
                let id = IssueId::new(
                    source.id.clone(),
                    user,
                    issue.key.clone(),
                    issue.issue_type_id.clone(),
                    report.session.clone(),
                );
                if tracker.dismissed.contains(&id) || !seen.insert(id.clone()) {
                    continue;
                }
                severity = severity.max(issue.severity.into());

                let actions = issue
                    .actions
                    .iter()
                    .map(|action| {
                        let action_id = ActionId::new(id.clone(), action.key.clone());
                        ActionView {
                            in_flight: tracker.in_flight.contains(&action_id),
                            id: action_id,
                            label: action.label.clone(),
                            will_resolve: action.will_resolve,
                        }
                    })
                    .collect();

                issues.push(IssueView {
                    id,
                    title: issue.title.clone(),
                    summary: issue.summary.clone(),
                    severity: issue.severity,
                    actions,
                });
            }
        }
    }

    if has_report && severity == OverallSeverity::Unknown {
        severity = OverallSeverity::Ok;
    }
    issues.sort_by(|a, b| b.severity.cmp(&a.severity));

    AggregateView {
        severity,
        sources,
        issues,
    }
}
