//! Domain types shared by the tracker, the listener registry and the broadcast
//! dispatcher.
//!
//! Identity of issues and actions is purely structural: an [`IssueId`] is the
//! tuple (source, user, issue key, issue type, report session) and crosses the
//! process boundary as an opaque string produced by [`IssueId::encode`].

mod ids;
mod profile;
mod report;
mod view;

pub use ids::*;
pub use profile::*;
pub use report::*;
pub use view::*;
