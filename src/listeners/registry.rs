use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use super::observer::same_observer;
use super::Observer;
use crate::ProfileGroup;
use crate::UserId;

/// Per user observer handles.
#[derive(Default)]
pub struct ListenerRegistry {
    observers: HashMap<UserId, Vec<Arc<dyn Observer>>>,
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        let counts: HashMap<&UserId, usize> = self.observers.iter().map(|(u, o)| (u, o.len())).collect();
        f.debug_struct("ListenerRegistry").field("observers", &counts).finish()
    }
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if this exact observer is already registered for `user`.
    pub fn add(
        &mut self,
        observer: Arc<dyn Observer>,
        user: UserId,
    ) -> bool {
        let observers = self.observers.entry(user).or_default();
        if observers.iter().any(|o| same_observer(o, &observer)) {
            debug!(%user, "observer already registered");
            return false;
        }
        observers.push(observer);
        true
    }

    /// Returns whether the observer was registered for `user`.
    pub fn remove(
        &mut self,
        observer: &Arc<dyn Observer>,
        user: UserId,
    ) -> bool {
        let Some(observers) = self.observers.get_mut(&user) else {
            return false;
        };
        let before = observers.len();
        observers.retain(|o| !same_observer(o, observer));
        let removed = observers.len() != before;
        if observers.is_empty() {
            self.observers.remove(&user);
        }
        removed
    }

    pub fn remove_all(
        &mut self,
        user: UserId,
    ) {
        self.observers.remove(&user);
    }

    pub fn clear(&mut self) {
        self.observers.clear();
    }

    pub fn len(&self) -> usize {
        self.observers.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Delivery list for `group`: every observer of every user in it,
    /// primary first.
    pub fn for_profile_group(
        &self,
        group: &ProfileGroup,
    ) -> Vec<Arc<dyn Observer>> {
        group
            .users()
            .filter_map(|user| self.observers.get(&user))
            .flatten()
            .cloned()
            .collect()
    }
}
