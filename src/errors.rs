//! Safety Broker Error Hierarchy
//!
//! Errors are split by who is at fault: the caller (malformed or unknown
//! identifiers), the access layer (cross profile group requests), outbound
//! dispatch (sources, observers and the dispatch sink), and configuration.
//!
//! "Not found" is deliberately absent: stale or unknown issues and actions are
//! logged no-ops, never errors.

use std::time::Duration;

use config::ConfigError;

use crate::SourceId;
use crate::UserId;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Request rejected before any state was touched
    #[error(transparent)]
    Caller(#[from] CallerError),

    /// Request crosses a profile group boundary
    #[error(transparent)]
    Access(#[from] AccessError),

    /// Outbound call to a source, observer or dispatch sink failed
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// Source declarations could not be loaded or validated
    #[error(transparent)]
    SourceConfig(#[from] SourceConfigError),

    /// Runtime settings could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    /// No source configuration was ever loaded for this process
    #[error("Safety broker is unavailable: {0}")]
    Unavailable(String),
}

impl Error {
    pub fn is_caller_error(&self) -> bool {
        matches!(self, Error::Caller(_))
    }

    pub fn is_access_denied(&self) -> bool {
        matches!(self, Error::Access(_))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CallerError {
    #[error("Unknown safety source: {0}")]
    UnknownSource(SourceId),

    /// Static sources are declared for display only and never report
    #[error("Safety source {0} is static and cannot report data")]
    StaticSource(SourceId),

    #[error("Safety source {source_id} is not configured for user {user}")]
    SourceOutOfScope { source_id: SourceId, user: UserId },

    #[error("Unknown user: {0}")]
    UnknownUser(UserId),

    #[error("Malformed {kind}: {reason}")]
    MalformedId { kind: &'static str, reason: String },

    #[error("Issue id {issue_id} and action id {action_id} do not match")]
    IdMismatch { issue_id: String, action_id: String },

    #[error("Invalid report from {source_id}: {reason}")]
    InvalidReport { source_id: SourceId, reason: String },
}

#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    #[error("{operation} requires target user {target} to be within the profile group of user {caller}")]
    CrossProfileGroup {
        operation: &'static str,
        target: UserId,
        caller: UserId,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Dispatch to {target} timed out after {duration:?}")]
    Timeout { target: String, duration: Duration },

    #[error("Dispatch to {target} failed: {reason}")]
    Failed { target: String, reason: String },

    /// Receiving end is gone (observer unregistered or source process died)
    #[error("Dispatch target {0} is disconnected")]
    Disconnected(String),
}

#[derive(Debug, thiserror::Error)]
pub enum SourceConfigError {
    #[error("Source configuration declares no sources")]
    NoSources,

    #[error("Source configuration contains an empty source id")]
    EmptySourceId,

    #[error("Duplicate source id {0} in source configuration")]
    DuplicateSourceId(SourceId),

    #[error("Failed to parse source configuration: {0}")]
    Parse(#[from] ConfigError),

    #[error("No source configuration path configured")]
    MissingPath,
}
