#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use safety_broker::Action;
use safety_broker::AggregateView;
use safety_broker::Dispatchable;
use safety_broker::DispatchSink;
use safety_broker::ErrorDetails;
use safety_broker::FileSourceConfigLoader;
use safety_broker::Issue;
use safety_broker::Observer;
use safety_broker::ProfileGroup;
use safety_broker::RefreshReason;
use safety_broker::Report;
use safety_broker::Result;
use safety_broker::SafetyEvent;
use safety_broker::SafetyHub;
use safety_broker::SafetyHubBuilder;
use safety_broker::Settings;
use safety_broker::Severity;
use safety_broker::SourceBroadcaster;
use safety_broker::SourceId;
use safety_broker::StaticProfileGroups;
use safety_broker::UserId;
use tempfile::TempDir;

pub const PRIMARY: UserId = UserId(0);
pub const WORK_PROFILE: UserId = UserId(10);
pub const OTHER_USER: UserId = UserId(20);

pub const LOCK_SCREEN: &str = "lock_screen";
pub const APP_SCANNER: &str = "app_scanner";
pub const ABOUT: &str = "about";

pub const SOURCES_TOML: &str = r#"
[[sources]]
id = "lock_screen"
kind = "dynamic"
profile = "primary_only"
title = "Screen lock"

[[sources]]
id = "app_scanner"
kind = "dynamic"
profile = "all_profiles"
title = "App scanner"

[[sources]]
id = "about"
kind = "static"
"#;

/// Writes the source declarations to a temp dir that lives as long as the
/// returned guard.
pub fn write_sources_file() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("sources.toml");
    std::fs::write(&path, SOURCES_TOML).expect("write sources");
    (dir, path)
}

pub fn sid(id: &str) -> SourceId {
    SourceId::new(id)
}

pub fn issue(key: &str) -> Issue {
    Issue::new(key, Severity::Recommendation)
        .with_type("generic")
        .with_title(format!("{key} title"), format!("{key} summary"))
        .with_action(Action::resolving("resolve", Dispatchable::new(format!("resolve://{key}"))))
}

pub fn report(
    session: &str,
    keys: &[&str],
) -> Report {
    keys.iter().fold(
        Report::new(session).with_status("Status", "Checked", Severity::Information),
        |report, key| report.with_issue(issue(key)),
    )
}

#[derive(Default)]
pub struct RecordingObserver {
    pub views: Mutex<Vec<(AggregateView, Option<ErrorDetails>)>>,
}

impl RecordingObserver {
    pub fn count(&self) -> usize {
        self.views.lock().len()
    }

    pub fn last(&self) -> AggregateView {
        self.views.lock().last().map(|(view, _)| view.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Observer for RecordingObserver {
    async fn on_data_changed(
        &self,
        view: &AggregateView,
        error: Option<ErrorDetails>,
    ) -> Result<()> {
        self.views.lock().push((view.clone(), error));
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingSink {
    pub dispatched: Mutex<Vec<(Dispatchable, UserId)>>,
}

#[async_trait]
impl DispatchSink for RecordingSink {
    async fn dispatch(
        &self,
        target: &Dispatchable,
        user: UserId,
    ) -> Result<()> {
        self.dispatched.lock().push((target.clone(), user));
        Ok(())
    }
}

/// Answers every refresh by pushing a report back into the hub before
/// returning, the way a source running in-process would.
#[derive(Default)]
pub struct ReentrantSources {
    pub hub: OnceCell<SafetyHub>,
    pub refreshes: Mutex<Vec<(SourceId, UserId, RefreshReason, String)>>,
    pub enabled_changes: Mutex<Vec<(SourceId, bool)>>,
}

#[async_trait]
impl SourceBroadcaster for ReentrantSources {
    async fn request_refresh(
        &self,
        source_id: &SourceId,
        user: UserId,
        reason: RefreshReason,
        broadcast_id: &str,
    ) -> Result<()> {
        self.refreshes
            .lock()
            .push((source_id.clone(), user, reason, broadcast_id.to_string()));
        if let Some(hub) = self.hub.get() {
            hub.set_report(
                source_id,
                Some(report(broadcast_id, &["refreshed"])),
                SafetyEvent::refresh(broadcast_id),
                user,
            )
            .await?;
        }
        Ok(())
    }

    async fn notify_enabled_changed(
        &self,
        source_id: &SourceId,
        enabled: bool,
    ) -> Result<()> {
        self.enabled_changes.lock().push((source_id.clone(), enabled));
        Ok(())
    }
}

pub struct Harness {
    pub hub: SafetyHub,
    pub sources: Arc<ReentrantSources>,
    pub sink: Arc<RecordingSink>,
    _sources_dir: TempDir,
}

/// A started hub over [`SOURCES_TOML`] for the groups {0, 10} and {20}.
pub fn start_hub() -> Harness {
    let _ = env_logger::builder().is_test(true).try_init();

    let sources = Arc::new(ReentrantSources::default());
    let sink = Arc::new(RecordingSink::default());
    let resolver = StaticProfileGroups::new([
        ProfileGroup::new(PRIMARY, vec![WORK_PROFILE]),
        ProfileGroup::single(OTHER_USER),
    ]);

    let hub = SafetyHubBuilder::new(Arc::new(resolver), sources.clone(), sink.clone())
        .settings(Settings::default())
        .build();
    let (dir, path) = write_sources_file();
    assert!(hub.start(&FileSourceConfigLoader::new(path)));
    assert!(sources.hub.set(hub.clone()).is_ok());

    Harness {
        hub,
        sources,
        sink,
        _sources_dir: dir,
    }
}
