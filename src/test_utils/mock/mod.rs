//! Hub assembly for unit tests.
//!
//! [`MockHubBuilder`] wires a [`crate::SafetyHub`] with [mockall] doubles for
//! the source transport and the dispatch sink, a static profile group
//! resolver and the shared test source config. Collaborators without
//! expectations panic when called, so a test only configures the calls it
//! expects.
//!
//! [mockall]: https://docs.rs/mockall/latest/mockall/

mod mock_builder;
mod recording_observer;

pub use mock_builder::*;
pub use recording_observer::*;
