//! the test_utils folder here shares fixtures and mocked collaborators between
//! unit tests of the tracker, the registry, the dispatcher and the hub
mod common;
mod mock;

pub use common::*;
pub use mock::*;
