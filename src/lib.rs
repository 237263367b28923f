//! Safety Broker
//!
//! Aggregates the safety and security status pushed by independent sources
//! for a user and the profiles of their profile group, derives one view of
//! the outstanding issues and their remediation actions, and notifies
//! observers whenever that view may have changed.
//!
//! The entry point is [`SafetyHub`], assembled with [`SafetyHubBuilder`]
//! from three collaborators the embedder provides:
//! - a [`ProfileGroupResolver`] mapping a user to its profile group
//! - a [`SourceBroadcaster`] reaching the sources (refresh, enabled state)
//! - a [`DispatchSink`] performing opaque action targets
//!
//! Observers implement [`Observer`]; source declarations come from a
//! [`SourceConfigLoader`] such as [`FileSourceConfigLoader`].

mod broadcast;
mod config;
mod constants;
mod errors;
mod hub;
mod listeners;
mod model;
mod source_config;
mod tracker;
mod utils;

pub mod metrics;

pub use broadcast::*;
pub use config::*;
pub use errors::*;
pub use hub::*;
pub use listeners::*;
pub use model::*;
pub use source_config::*;
pub use tracker::*;

//-----------------------------------------------------------
// Test utils

#[cfg(test)]
pub mod test_utils;
