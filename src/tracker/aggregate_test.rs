use super::*;
use crate::test_utils::*;
use crate::Issue;
use crate::OverallSeverity;
use crate::Report;
use crate::SafetyEvent;
use crate::Severity;
use crate::SourceErrorDetails;
use crate::UserId;

fn push(
    tracker: &mut DataTracker,
    source: &str,
    user: UserId,
    report: Report,
) {
    // OTHER_USER is the primary of its own group
    let group = if user == OTHER_USER { other_group() } else { primary_group() };
    tracker
        .set_report(&test_config(), Some(report), &sid(source), state_changed(), user, &group)
        .expect("should store");
}

#[test]
fn empty_tracker_should_produce_default_view() {
    let tracker = DataTracker::new();

    let view = tracker.get_aggregate(&test_config(), &primary_group());

    assert_eq!(view, crate::AggregateView::default());
    assert_eq!(view.severity, OverallSeverity::Unknown);
}

#[test]
fn report_for_another_group_should_not_be_visible() {
    let mut tracker = DataTracker::new();
    push(&mut tracker, PRIMARY_ONLY_SOURCE, OTHER_USER, report_with_issues("s1", &["secret"]));

    let view = tracker.get_aggregate(&test_config(), &primary_group());

    assert!(view.is_empty());
    let other = tracker.get_aggregate(&test_config(), &other_group());
    assert_eq!(other.issues.len(), 1);
}

#[test]
fn profiles_of_the_group_should_be_merged() {
    let mut tracker = DataTracker::new();
    push(&mut tracker, ALL_PROFILES_SOURCE, PRIMARY, report_with_issues("s1", &["personal"]));
    push(&mut tracker, ALL_PROFILES_SOURCE, WORK_PROFILE, report_with_issues("s1", &["work"]));

    let view = tracker.get_aggregate(&test_config(), &primary_group());

    let keys: Vec<&str> = view.issues.iter().map(|i| i.id.issue_key.as_str()).collect();
    assert_eq!(keys, vec!["personal", "work"]);
    assert_eq!(view.sources.len(), 2);
    assert_eq!(view.issues[1].id.user_id, WORK_PROFILE);
}

#[test]
fn issues_should_be_ranked_by_severity_then_declaration_order() {
    let mut tracker = DataTracker::new();
    push(
        &mut tracker,
        PRIMARY_ONLY_SOURCE,
        PRIMARY,
        Report::new("s1")
            .with_issue(Issue::new("low", Severity::Information))
            .with_issue(Issue::new("high", Severity::CriticalWarning)),
    );
    push(
        &mut tracker,
        ALL_PROFILES_SOURCE,
        PRIMARY,
        Report::new("s1")
            .with_issue(Issue::new("low_2", Severity::Information))
            .with_issue(Issue::new("mid", Severity::Recommendation)),
    );

    let view = tracker.get_aggregate(&test_config(), &primary_group());

    let keys: Vec<&str> = view.issues.iter().map(|i| i.id.issue_key.as_str()).collect();
    assert_eq!(keys, vec!["high", "mid", "low", "low_2"]);
    assert_eq!(view.severity, OverallSeverity::CriticalWarning);
}

#[test]
fn dismissed_issues_should_be_excluded_from_view_and_severity() {
    let mut tracker = DataTracker::new();
    push(
        &mut tracker,
        PRIMARY_ONLY_SOURCE,
        PRIMARY,
        Report::new("s1").with_issue(resolvable_issue("i1", Severity::CriticalWarning)),
    );
    tracker.dismiss(&issue_id(PRIMARY_ONLY_SOURCE, PRIMARY, "i1", "s1"));

    let view = tracker.get_aggregate(&test_config(), &primary_group());

    assert!(view.issues.is_empty());
    assert_eq!(view.severity, OverallSeverity::Ok);
}

#[test]
fn in_flight_actions_should_be_annotated() {
    let mut tracker = DataTracker::new();
    push(&mut tracker, PRIMARY_ONLY_SOURCE, PRIMARY, report_with_issues("s1", &["i1"]));
    let issue = issue_id(PRIMARY_ONLY_SOURCE, PRIMARY, "i1", "s1");
    tracker.mark_in_flight(&action_id(&issue, RESOLVE_ACTION));

    let view = tracker.get_aggregate(&test_config(), &primary_group());

    let actions = &view.issue(&issue).expect("issue visible").actions;
    assert!(actions.iter().find(|a| a.id.action_key == RESOLVE_ACTION).unwrap().in_flight);
    assert!(!actions.iter().find(|a| a.id.action_key == LEARN_MORE_ACTION).unwrap().in_flight);
}

#[test]
fn issue_only_source_should_contribute_issues_but_no_status() {
    let mut tracker = DataTracker::new();
    push(&mut tracker, ISSUE_ONLY_SOURCE, WORK_PROFILE, report_with_issues("s1", &["policy"]));

    let view = tracker.get_aggregate(&test_config(), &primary_group());

    assert!(view.sources.is_empty());
    assert_eq!(view.issues.len(), 1);
    assert_eq!(view.severity, OverallSeverity::Recommendation);
}

#[test]
fn failing_source_should_show_up_as_in_error() {
    let mut tracker = DataTracker::new();
    tracker
        .record_source_error(
            &test_config(),
            &sid(ALL_PROFILES_SOURCE),
            &SourceErrorDetails {
                event: SafetyEvent::refresh("b1"),
            },
            PRIMARY,
            &primary_group(),
        )
        .unwrap();

    let view = tracker.get_aggregate(&test_config(), &primary_group());

    assert_eq!(view.sources.len(), 1);
    assert!(view.sources[0].in_error);
    assert_eq!(view.sources[0].title, "App scanner");
    assert_eq!(view.severity, OverallSeverity::Unknown);
}

#[test]
fn sources_should_follow_config_order() {
    let mut tracker = DataTracker::new();
    push(&mut tracker, ALL_PROFILES_SOURCE, PRIMARY, report_with_issues("s1", &[]));
    push(&mut tracker, PRIMARY_ONLY_SOURCE, PRIMARY, report_with_issues("s1", &[]));

    let view = tracker.get_aggregate(&test_config(), &primary_group());

    let ids: Vec<&str> = view.sources.iter().map(|s| s.source_id.as_str()).collect();
    assert_eq!(ids, vec![PRIMARY_ONLY_SOURCE, ALL_PROFILES_SOURCE]);
    assert_eq!(view.severity, OverallSeverity::Ok);
}
