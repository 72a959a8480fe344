//! Data sources consumed by the notes aggregator
//!
//! Implemented by [`crate::core::vcs::SystemGit`] and
//! [`crate::github::GitHubClient`]; tests use in-memory fakes.

use crate::core::error::HeraldResult;
use crate::notes::contributors::ContributorSet;
use crate::notes::model::{Commit, Improvement};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

pub trait CommitSource {
  /// Commits reachable from `to` but not from `from`, newest first
  fn commits_between(&self, from: &str, to: &str) -> HeraldResult<Vec<Commit>>;

  /// Commit count per author name since `from`, up to HEAD
  fn contributions_since(&self, from: &str) -> HeraldResult<BTreeMap<String, u32>> {
    let mut counts = BTreeMap::new();
    for commit in self.commits_between(from, "HEAD")? {
      *counts.entry(commit.author).or_insert(0) += 1;
    }
    Ok(counts)
  }
}

pub trait ReleaseDateSource {
  /// Date of the tagged commit, `None` when the tag does not exist
  fn release_date(&self, tag: &str) -> Option<DateTime<Utc>>;
}

pub trait IssueSource {
  /// Closed issues and pull requests in the given window, in tracker order
  fn closed_improvements(
    &self,
    labels: &[String],
    since: Option<DateTime<Utc>>,
    until: Option<DateTime<Utc>>,
  ) -> HeraldResult<Vec<Improvement>>;
}

pub trait ContributorSource {
  fn all_contributors(&self) -> HeraldResult<ContributorSet>;
}
