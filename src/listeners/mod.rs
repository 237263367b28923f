//! Observer registrations and the fan-out of aggregate views.
//!
//! The registry only holds handles; what gets delivered is computed by the
//! hub under the state lock and handed to [`deliver`] after the lock is
//! released.

mod delivery;
mod observer;
mod registry;

pub use delivery::*;
pub use observer::*;
pub use registry::*;
