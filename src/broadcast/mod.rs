//! Outbound calls to sources: refresh requests and enabled-state changes.
//!
//! Dispatch is strictly sequential. Sources may call back into the hub while
//! being dispatched to, so the dispatcher lives behind its own lock and never
//! sees the state lock.

mod broadcaster;
mod dispatcher;

pub use broadcaster::*;
pub use dispatcher::*;
