//! Declarations of the safety sources known to the broker.
//!
//! A [`ConfigSnapshot`] is immutable once built and is shared as an
//! `Arc<ConfigSnapshot>`, so it can be copied out of the state lock and handed
//! to the broadcast dispatcher without holding anything.

mod loader;
mod reader;
mod snapshot;

pub use loader::*;
pub(crate) use reader::*;
pub use snapshot::*;
