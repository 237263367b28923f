//! The public operation surface.
//!
//! [`SafetyHub`] owns two lock domains that are never nested:
//! - the state lock (`parking_lot::Mutex<HubState>`) around the source
//!   config, the [`crate::DataTracker`] and the [`crate::ListenerRegistry`].
//!   It is never held across an await point.
//! - the broadcast lock (`tokio::sync::Mutex<BroadcastDispatcher>`) held for
//!   the whole of a sequential source broadcast.
//!
//! Only plain values (an `Arc<ConfigSnapshot>`, a `ProfileGroup`, an
//! `AggregateView` and its delivery list) leave the state lock; sources
//! called during a broadcast can therefore re-enter the hub freely.

mod builder;
mod dispatch_sink;
mod enabled_watcher;
mod safety_hub;
mod state;

pub use builder::*;
pub use dispatch_sink::*;
pub use enabled_watcher::*;
pub use safety_hub::*;

#[cfg(test)]
mod builder_test;
