//! The release-needed decision
//!
//! A release happens only when nothing asks to skip it, the build is not a
//! pull request, the branch may release, and the publications changed.

use crate::core::error::{HeraldError, HeraldResult};
use regex::Regex;
use std::fmt;

/// Inputs of the decision, gathered by the caller from CI, git and the comparator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReleaseSignals {
  pub skip_by_env_flag: bool,
  pub skip_by_commit_message: bool,
  pub is_pull_request: bool,
  pub is_releasable_branch: bool,
  pub publications_equal: bool,
}

pub fn release_needed(signals: &ReleaseSignals) -> bool {
  !signals.skip_by_env_flag
    && !signals.skip_by_commit_message
    && !signals.is_pull_request
    && signals.is_releasable_branch
    && !signals.publications_equal
}

/// Whether the whole branch name matches the pattern
pub fn is_releasable_branch(branch: &str, pattern: &str) -> HeraldResult<bool> {
  let regex = Regex::new(&format!("^(?:{})$", pattern))
    .map_err(|e| HeraldError::invalid_config("git.releasable_branch_regex", e.to_string()))?;
  Ok(regex.is_match(branch))
}

/// Decision together with everything it was based on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseReport {
  pub signals: ReleaseSignals,
  pub branch: Option<String>,
  pub pattern: String,
  pub needed: bool,
}

impl fmt::Display for ReleaseReport {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = &self.signals;
    writeln!(f, "Release needed: {}", self.needed)?;
    writeln!(f, "  - skip by env variable: {}", s.skip_by_env_flag)?;
    writeln!(f, "  - skip by commit message: {}", s.skip_by_commit_message)?;
    writeln!(f, "  - pull request build: {}", s.is_pull_request)?;
    writeln!(
      f,
      "  - releasable branch: {} (branch: {}, pattern: {})",
      s.is_releasable_branch,
      self.branch.as_deref().unwrap_or("<unknown>"),
      self.pattern
    )?;
    write!(f, "  - publications equal: {}", s.publications_equal)
  }
}

/// Build the report; in explosive mode a skipped release is an error
pub fn decide(signals: ReleaseSignals, branch: Option<&str>, pattern: &str, explosive: bool) -> HeraldResult<ReleaseReport> {
  let report = ReleaseReport {
    signals,
    branch: branch.map(str::to_string),
    pattern: pattern.to_string(),
    needed: release_needed(&signals),
  };
  if explosive && !report.needed {
    return Err(HeraldError::ReleaseNotNeeded {
      report: report.to_string(),
    });
  }
  Ok(report)
}
