use std::collections::HashMap;
use std::fmt;

#[cfg(test)]
use mockall::automock;

use crate::CallerError;
use crate::Result;
use crate::UserId;

/// A primary user together with its managed profiles. All members share one
/// aggregate view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileGroup {
    primary: UserId,
    profiles: Vec<UserId>,
}

impl ProfileGroup {
    pub fn new(
        primary: UserId,
        profiles: Vec<UserId>,
    ) -> Self {
        let mut unique = Vec::with_capacity(profiles.len());
        for profile in profiles {
            if profile != primary && !unique.contains(&profile) {
                unique.push(profile);
            }
        }
        Self {
            primary,
            profiles: unique,
        }
    }

    pub fn single(user: UserId) -> Self {
        Self {
            primary: user,
            profiles: Vec::new(),
        }
    }

    pub fn primary(&self) -> UserId {
        self.primary
    }

    pub fn profiles(&self) -> &[UserId] {
        &self.profiles
    }

    /// Primary user first, then profiles in declaration order
    pub fn users(&self) -> impl Iterator<Item = UserId> + '_ {
        std::iter::once(self.primary).chain(self.profiles.iter().copied())
    }

    pub fn contains(
        &self,
        user: UserId,
    ) -> bool {
        self.primary == user || self.profiles.contains(&user)
    }

    pub fn is_managed_profile(
        &self,
        user: UserId,
    ) -> bool {
        self.profiles.contains(&user)
    }
}

impl fmt::Display for ProfileGroup {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "ProfileGroup(primary={}, profiles={:?})", self.primary, self.profiles)
    }
}

/// Maps an acting user to its profile group. Called on every request; the
/// broker never caches the answer.
#[cfg_attr(test, automock)]
pub trait ProfileGroupResolver: Send + Sync + 'static {
    /// Returns [`CallerError::UnknownUser`] when the user does not exist
    fn resolve(
        &self,
        user: UserId,
    ) -> Result<ProfileGroup>;
}

/// Resolver over a fixed set of groups, for embedders without a user manager.
#[derive(Debug, Clone, Default)]
pub struct StaticProfileGroups {
    groups: HashMap<UserId, ProfileGroup>,
}

impl StaticProfileGroups {
    pub fn new(groups: impl IntoIterator<Item = ProfileGroup>) -> Self {
        let mut by_user = HashMap::new();
        for group in groups {
            for user in group.users() {
                by_user.insert(user, group.clone());
            }
        }
        Self { groups: by_user }
    }
}

impl ProfileGroupResolver for StaticProfileGroups {
    fn resolve(
        &self,
        user: UserId,
    ) -> Result<ProfileGroup> {
        self.groups
            .get(&user)
            .cloned()
            .ok_or_else(|| CallerError::UnknownUser(user).into())
    }
}
