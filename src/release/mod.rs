//! Release gating
//!
//! - **needed**: combine CI signals, branch policy and the publication
//!   comparison into a single release-needed decision

pub mod needed;

pub use needed::{ReleaseSignals, decide, is_releasable_branch};
