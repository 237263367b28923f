use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;
use tracing::instrument;
use tracing::warn;

use super::state::Delivery;
use super::state::HubState;
use super::DispatchSink;
use super::EnabledStateWatcher;
use crate::constants::DISPATCH_KIND_ACTION;
use crate::constants::DISPATCH_KIND_DISMISS;
use crate::listeners::deliver;
use crate::metrics::DISPATCH_FAILURES;
use crate::utils::async_task::call_with_timeout;
use crate::utils::async_task::spawn_task;
use crate::AccessError;
use crate::ActionId;
use crate::AggregateView;
use crate::BroadcastDispatcher;
use crate::CallerError;
use crate::ConfigSnapshot;
use crate::Dispatchable;
use crate::Error;
use crate::ErrorDetails;
use crate::IssueId;
use crate::Observer;
use crate::ProfileGroup;
use crate::ProfileGroupResolver;
use crate::RefreshReason;
use crate::Report;
use crate::Result;
use crate::SafetyEvent;
use crate::Settings;
use crate::SourceConfigLoader;
use crate::SourceErrorDetails;
use crate::SourceId;
use crate::UserId;

/// Cheaply cloneable handle on the broker.
///
/// Callers are expected to have checked identity and permissions already;
/// the hub only resolves the acting user into its profile group and keeps
/// every request inside that group.
#[derive(Clone)]
pub struct SafetyHub {
    pub(super) inner: Arc<HubInner>,
}

pub(super) struct HubInner {
    pub(super) state: Mutex<HubState>,
    pub(super) broadcast: tokio::sync::Mutex<BroadcastDispatcher>,
    /// Flipped only while the state lock is held
    pub(super) enabled: AtomicBool,
    pub(super) resolver: Arc<dyn ProfileGroupResolver>,
    pub(super) dispatch_sink: Arc<dyn DispatchSink>,
    pub(super) settings: Arc<Settings>,
}

impl std::fmt::Debug for SafetyHub {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("SafetyHub")
            .field("enabled", &self.inner.enabled.load(Ordering::Acquire))
            .field("settings", &self.inner.settings)
            .finish()
    }
}

impl SafetyHub {
    /// Loads the source declarations. Returns whether a configuration is now
    /// available; without one the hub behaves as disabled.
    ///
    /// Only the first call loads anything. Once a load failed the hub stays
    /// unavailable for the life of the process.
    pub fn start(
        &self,
        loader: &dyn SourceConfigLoader,
    ) -> bool {
        self.inner.state.lock().config_reader.load_config(loader)
    }

    /// Watches `toggle` in the background until `shutdown` fires.
    pub fn spawn_enabled_watcher(
        &self,
        toggle: watch::Receiver<bool>,
        shutdown: watch::Receiver<()>,
    ) -> JoinHandle<()> {
        let watcher = EnabledStateWatcher::new(self.clone());
        spawn_task("enabled_state_watcher", move || watcher.run(toggle, shutdown))
    }

    pub fn settings(&self) -> Arc<Settings> {
        self.inner.settings.clone()
    }

    /// The feature toggle is on and a source configuration is available.
    pub fn is_enabled(&self) -> bool {
        let state = self.inner.state.lock();
        self.is_active(&state)
    }

    /// Stores the report `source_id` pushes for `user` and notifies the
    /// observers of the user's profile group if anything changed.
    #[instrument(skip_all, fields(source_id = %source_id, user = %user))]
    pub async fn set_report(
        &self,
        source_id: &SourceId,
        report: Option<Report>,
        event: SafetyEvent,
        user: UserId,
    ) -> Result<()> {
        let group = self.inner.resolver.resolve(user)?;

        let delivery = {
            let mut state = self.inner.state.lock();
            if !self.is_active(&state) {
                debug!("set_report ignored: safety hub is disabled");
                return Ok(());
            }
            let config = state.config();
            if !state
                .tracker
                .set_report(&config, report, source_id, event, user, &group)?
            {
                return Ok(());
            }
            state.delivery_for(&group)
        };

        self.notify(delivery, None).await;
        Ok(())
    }

    pub fn get_report(
        &self,
        source_id: &SourceId,
        user: UserId,
    ) -> Result<Option<Report>> {
        let state = self.inner.state.lock();
        if !self.is_active(&state) {
            return Ok(None);
        }
        state.tracker.get_report(&state.config(), source_id, user)
    }

    /// Marks `source_id` as failing for `user` until its next report.
    #[instrument(skip_all, fields(source_id = %source_id, user = %user))]
    pub async fn record_source_error(
        &self,
        source_id: &SourceId,
        error: SourceErrorDetails,
        user: UserId,
    ) -> Result<()> {
        let group = self.inner.resolver.resolve(user)?;

        let (delivery, details) = {
            let mut state = self.inner.state.lock();
            if !self.is_active(&state) {
                debug!("record_source_error ignored: safety hub is disabled");
                return Ok(());
            }
            let config = state.config();
            let outcome = state
                .tracker
                .record_source_error(&config, source_id, &error, user, &group)?;
            if !outcome.changed && outcome.details.is_none() {
                return Ok(());
            }
            (state.delivery_for(&group), outcome.details)
        };

        self.notify(delivery, details.as_ref()).await;
        Ok(())
    }

    /// Asks every in-scope source of `user`'s profile group to re-report.
    ///
    /// Returns the broadcast id, or `None` when the hub is disabled. The
    /// state lock is released before the first source is contacted.
    #[instrument(skip(self))]
    pub async fn request_refresh(
        &self,
        reason: RefreshReason,
        user: UserId,
    ) -> Result<Option<String>> {
        let group = self.inner.resolver.resolve(user)?;

        let config = {
            let state = self.inner.state.lock();
            if !self.is_active(&state) {
                debug!("request_refresh ignored: safety hub is disabled");
                return Ok(None);
            }
            state.config()
        };

        let dispatcher = self.inner.broadcast.lock().await;
        let (broadcast_id, _) = dispatcher.send_refresh(&config, reason, &group).await;
        Ok(Some(broadcast_id))
    }

    /// The merged view of `user`'s profile group; empty when disabled.
    pub fn get_aggregate(
        &self,
        user: UserId,
    ) -> Result<AggregateView> {
        let group = self.inner.resolver.resolve(user)?;
        let state = self.inner.state.lock();
        if !self.is_active(&state) {
            return Ok(AggregateView::default());
        }
        Ok(state.tracker.get_aggregate(&state.config(), &group))
    }

    /// Registers `observer` for `user`. A new registration receives the
    /// current view before this returns.
    ///
    /// Returns false if the observer was already registered or the hub is
    /// disabled.
    #[instrument(skip_all, fields(user = %user))]
    pub async fn add_observer(
        &self,
        observer: Arc<dyn Observer>,
        user: UserId,
    ) -> Result<bool> {
        let group = self.inner.resolver.resolve(user)?;

        let view = {
            let mut state = self.inner.state.lock();
            if !self.is_active(&state) {
                debug!("add_observer ignored: safety hub is disabled");
                return Ok(false);
            }
            if !state.listeners.add(observer.clone(), user) {
                return Ok(false);
            }
            state.tracker.get_aggregate(&state.config(), &group)
        };

        self.notify(
            Delivery {
                view,
                observers: vec![observer],
            },
            None,
        )
        .await;
        Ok(true)
    }

    pub fn remove_observer(
        &self,
        observer: &Arc<dyn Observer>,
        user: UserId,
    ) -> bool {
        self.inner.state.lock().listeners.remove(observer, user)
    }

    /// Hides an issue from the aggregate until its source supersedes it.
    ///
    /// Unknown, stale or already dismissed issues are logged no-ops.
    #[instrument(skip(self))]
    pub async fn dismiss_issue(
        &self,
        issue_id: &str,
        user: UserId,
    ) -> Result<()> {
        let id = IssueId::decode(issue_id)?;
        let group = self.group_owning(user, id.user_id, "dismiss_issue")?;

        let (delivery, on_dismiss) = {
            let mut state = self.inner.state.lock();
            if !self.is_active(&state) {
                debug!("dismiss_issue ignored: safety hub is disabled");
                return Ok(());
            }
            let on_dismiss = state
                .tracker
                .find_issue(&id)
                .and_then(|issue| issue.on_dismiss.clone());
            if !state.tracker.dismiss(&id) {
                return Ok(());
            }
            (state.delivery_for(&group), on_dismiss)
        };

        self.notify(delivery, None).await;
        if let Some(target) = on_dismiss {
            self.dispatch(&target, id.user_id, DISPATCH_KIND_DISMISS).await;
        }
        Ok(())
    }

    /// Runs an action of a live issue.
    ///
    /// A resolving action is marked in flight before it is dispatched and
    /// stays so until its source supersedes the issue; executing it again in
    /// the meantime is a logged no-op. Dispatch failures are only logged.
    #[instrument(skip(self))]
    pub async fn execute_action(
        &self,
        issue_id: &str,
        action_id: &str,
        user: UserId,
    ) -> Result<()> {
        let issue = IssueId::decode(issue_id)?;
        let action_id_decoded = ActionId::decode(action_id)?;
        if action_id_decoded.issue_id != issue {
            return Err(CallerError::IdMismatch {
                issue_id: issue_id.to_string(),
                action_id: action_id.to_string(),
            }
            .into());
        }
        let id = action_id_decoded;
        let group = self.group_owning(user, issue.user_id, "execute_action")?;

        let (delivery, target) = {
            let mut state = self.inner.state.lock();
            if !self.is_active(&state) {
                debug!("execute_action ignored: safety hub is disabled");
                return Ok(());
            }
            let Some(action) = state.tracker.find_action(&id).cloned() else {
                warn!(action_id = ?id, "execute_action: action not found or already in flight");
                return Ok(());
            };
            let delivery = if action.will_resolve && state.tracker.mark_in_flight(&id) {
                Some(state.delivery_for(&group))
            } else {
                None
            };
            (delivery, action.target)
        };

        if let Some(delivery) = delivery {
            self.notify(delivery, None).await;
        }
        self.dispatch(&target, issue.user_id, DISPATCH_KIND_ACTION).await;
        Ok(())
    }

    /// The active source configuration.
    pub fn get_config(&self) -> Result<Arc<ConfigSnapshot>> {
        let state = self.inner.state.lock();
        if !state.config_reader.has_config() {
            return Err(Error::Unavailable("no source configuration loaded".to_string()));
        }
        Ok(state.config())
    }

    /// Drops every tracked report, dismissal and in-flight marker.
    pub fn clear_all(&self) {
        self.inner.state.lock().tracker.clear();
    }

    /// Replaces the source configuration until [`SafetyHub::reset_config`].
    /// Tracked data referring to the previous configuration is dropped.
    ///
    /// Fails with [`Error::Unavailable`] unless [`SafetyHub::start`] loaded a
    /// configuration.
    pub fn override_config(
        &self,
        snapshot: ConfigSnapshot,
    ) -> Result<()> {
        snapshot.validate()?;
        let mut state = self.inner.state.lock();
        state.config_reader.set_override(snapshot)?;
        state.tracker.clear();
        Ok(())
    }

    /// Drops the override installed by [`SafetyHub::override_config`].
    pub fn reset_config(&self) -> Result<()> {
        let mut state = self.inner.state.lock();
        state.config_reader.clear_override()?;
        state.tracker.clear();
        Ok(())
    }

    //---
    // Internals shared with the enabled watcher

    fn is_active(
        &self,
        state: &HubState,
    ) -> bool {
        self.inner.enabled.load(Ordering::Acquire) && state.config_reader.has_config()
    }

    /// Flips the enabled flag under the state lock, clearing everything on
    /// disable. Returns the config to broadcast the change with, or `None`
    /// if the value did not change and `force` is unset.
    pub(super) fn transition_enabled(
        &self,
        enabled: bool,
        force: bool,
    ) -> Option<Arc<ConfigSnapshot>> {
        let mut state = self.inner.state.lock();
        if self.inner.enabled.swap(enabled, Ordering::AcqRel) == enabled && !force {
            return None;
        }
        if !enabled {
            state.clear();
        }
        Some(state.config())
    }

    /// Resolves `caller` and checks that `target` belongs to its group.
    fn group_owning(
        &self,
        caller: UserId,
        target: UserId,
        operation: &'static str,
    ) -> Result<ProfileGroup> {
        let group = self.inner.resolver.resolve(caller)?;
        if !group.contains(target) {
            return Err(AccessError::CrossProfileGroup {
                operation,
                target,
                caller,
            }
            .into());
        }
        Ok(group)
    }

    async fn notify(
        &self,
        delivery: Delivery,
        error: Option<&ErrorDetails>,
    ) {
        deliver(
            &delivery.observers,
            &delivery.view,
            error,
            self.inner.settings.delivery.observer_timeout(),
        )
        .await;
    }

    async fn dispatch(
        &self,
        target: &Dispatchable,
        user: UserId,
        kind: &'static str,
    ) {
        let result = call_with_timeout(
            target.as_str(),
            self.inner.settings.delivery.action_timeout(),
            self.inner.dispatch_sink.dispatch(target, user),
        )
        .await;
        if let Err(e) = result {
            warn!(%target, %user, kind, error = %e, "dispatch failed");
            DISPATCH_FAILURES.with_label_values(&[kind]).inc();
        }
    }
}
