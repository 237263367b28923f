// -
// Settings

/// Prefix of environment variables overriding [`crate::Settings`]
pub(crate) const ENV_PREFIX: &str = "SAFETY_BROKER";
pub(crate) const ENV_SEPARATOR: &str = "__";
/// Extra settings file layered on top of the defaults
pub(crate) const CONFIG_PATH_ENV: &str = "CONFIG_PATH";

pub(crate) const DEFAULT_SOURCE_TIMEOUT_IN_MS: u64 = 5000;
pub(crate) const DEFAULT_OBSERVER_TIMEOUT_IN_MS: u64 = 1000;
pub(crate) const DEFAULT_ACTION_TIMEOUT_IN_MS: u64 = 5000;

// -
// Identifier encoding

pub(crate) const ISSUE_ID_KIND: &str = "issue id";
pub(crate) const ACTION_ID_KIND: &str = "action id";

// -
// User facing error messages

pub(crate) const REFRESH_ERROR_MESSAGE: &str = "Couldn't refresh safety status";
pub(crate) const RESOLVING_ACTION_ERROR_MESSAGE: &str = "Couldn't complete the action";

// -
// Metric labels

pub(crate) const DISPATCH_KIND_REFRESH: &str = "refresh";
pub(crate) const DISPATCH_KIND_ENABLED_CHANGED: &str = "enabled_changed";
pub(crate) const DISPATCH_KIND_ACTION: &str = "action";
pub(crate) const DISPATCH_KIND_DISMISS: &str = "dismiss";
