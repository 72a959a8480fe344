//! Core plumbing shared by every cargo-herald command
//!
//! - **ci**: CI environment signals (skip flags, pull requests, branch, build number)
//! - **config**: herald.toml parsing and validation
//! - **context**: run context built once in main
//! - **error**: error types with contextual help messages and exit codes
//! - **exec**: process runner that masks secrets
//! - **secrets**: secret masking
//! - **vcs**: git operations (SystemGit)

pub mod ci;
pub mod config;
pub mod context;
pub mod error;
pub mod exec;
pub mod secrets;
pub mod vcs;
