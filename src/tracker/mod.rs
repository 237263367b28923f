//! The aggregation state machine.
//!
//! [`DataTracker`] owns every report pushed by sources, the issues the user
//! dismissed and the resolving actions currently in flight. Dismissals and
//! in-flight markers are side sets keyed by composite ids, so when a source
//! supersedes its report with a new session the old markers stop matching
//! anything without explicit cleanup.
//!
//! The tracker is not synchronized; it lives behind the hub's state lock.

mod aggregate;
mod data_tracker;

pub use data_tracker::*;

#[cfg(test)]
mod aggregate_test;
