use crate::Action;
use crate::ActionId;
use crate::ConfigSnapshot;
use crate::Dispatchable;
use crate::Issue;
use crate::IssueId;
use crate::ProfileGroup;
use crate::ProfileScope;
use crate::Report;
use crate::SafetyEvent;
use crate::SafetyEventKind;
use crate::Severity;
use crate::SourceConfig;
use crate::SourceId;
use crate::SourceKind;
use crate::UserId;

pub const PRIMARY: UserId = UserId(0);
pub const WORK_PROFILE: UserId = UserId(10);
pub const OTHER_USER: UserId = UserId(20);

pub const PRIMARY_ONLY_SOURCE: &str = "lock_screen";
pub const ALL_PROFILES_SOURCE: &str = "app_scanner";
pub const ISSUE_ONLY_SOURCE: &str = "work_policy";
pub const STATIC_SOURCE: &str = "about";

pub const ISSUE_TYPE: &str = "generic";
pub const RESOLVE_ACTION: &str = "resolve";
pub const LEARN_MORE_ACTION: &str = "learn_more";

/// Four sources, one of each kind:
/// 1. `lock_screen`: dynamic, primary only
/// 2. `app_scanner`: dynamic, all profiles
/// 3. `work_policy`: issue only, all profiles
/// 4. `about`: static
pub fn test_config() -> ConfigSnapshot {
    ConfigSnapshot::new(vec![
        SourceConfig::dynamic(PRIMARY_ONLY_SOURCE).with_title("Screen lock"),
        SourceConfig::dynamic(ALL_PROFILES_SOURCE)
            .with_title("App scanner")
            .with_profile(ProfileScope::AllProfiles),
        SourceConfig::new(ISSUE_ONLY_SOURCE, SourceKind::IssueOnly, ProfileScope::AllProfiles),
        SourceConfig::new(STATIC_SOURCE, SourceKind::Static, ProfileScope::PrimaryOnly),
    ])
    .expect("test config is valid")
}

/// Primary user with one work profile
pub fn primary_group() -> ProfileGroup {
    ProfileGroup::new(PRIMARY, vec![WORK_PROFILE])
}

pub fn other_group() -> ProfileGroup {
    ProfileGroup::single(OTHER_USER)
}

pub fn sid(id: &str) -> SourceId {
    SourceId::new(id)
}

pub fn state_changed() -> SafetyEvent {
    SafetyEvent::new(SafetyEventKind::SourceStateChanged)
}

/// Issue with one resolving and one informational action
pub fn resolvable_issue(
    key: &str,
    severity: Severity,
) -> Issue {
    Issue::new(key, severity)
        .with_type(ISSUE_TYPE)
        .with_title(format!("{key} title"), format!("{key} summary"))
        .with_action(Action::resolving(RESOLVE_ACTION, Dispatchable::new(format!("resolve://{key}"))))
        .with_action(Action::informational(
            LEARN_MORE_ACTION,
            Dispatchable::new(format!("learn://{key}")),
        ))
}

/// Report with a status and one resolvable issue per key
pub fn report_with_issues(
    session: &str,
    keys: &[&str],
) -> Report {
    keys.iter().fold(
        Report::new(session).with_status("Status", "All good", Severity::Information),
        |report, key| report.with_issue(resolvable_issue(key, Severity::Recommendation)),
    )
}

pub fn issue_id(
    source: &str,
    user: UserId,
    key: &str,
    session: &str,
) -> IssueId {
    IssueId::new(sid(source), user, key, ISSUE_TYPE, session)
}

pub fn action_id(
    issue_id: &IssueId,
    action_key: &str,
) -> ActionId {
    ActionId::new(issue_id.clone(), action_key)
}

static LOGGER_INIT: once_cell::sync::Lazy<()> = once_cell::sync::Lazy::new(|| {
    let _ = env_logger::builder().is_test(true).try_init();
});

pub fn enable_logger() {
    *LOGGER_INIT;
}
