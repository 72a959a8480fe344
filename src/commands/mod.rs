//! CLI commands for cargo-herald
//!
//! ## Setup
//! - **init**: write a starter herald.toml
//!
//! ## Release notes
//! - **notes**: fetch notes data and contributors, preview, update and notable notes
//!
//! ## Release gating
//! - **compare**: compare the current publications with the previous release
//! - **release**: decide whether a release is needed
//!
//! ## Publishing
//! - **git**: commit the release notes files, push branch and tag
//!
//! All commands except init accept `&HeraldContext` to avoid redundant config loads.

pub mod compare;
pub mod git;
pub mod init;
pub mod notes;
pub mod release;

pub use compare::run_compare;
pub use git::{run_commit, run_push};
pub use init::run_init;
pub use notes::{run_notes_contributors, run_notes_fetch, run_notes_notable, run_notes_preview, run_notes_update};
pub use release::run_release_needed;
