//! GitHub issue tracker and contributor data

mod api;
pub mod client;

pub use client::GitHubClient;
