//! Release notes data model
//!
//! Everything here is built once per fetch pass and never mutated afterwards.
//! The types derive serde so the fetch stage can hand them to the format stage
//! through [`crate::notes::serialize`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single VCS commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
  pub id: String,
  pub message: String,
  pub author: String,
  #[serde(default)]
  pub author_email: String,
}

impl Commit {
  #[allow(dead_code)] // Fixture constructor, git history is parsed field by field
  pub fn new(id: impl Into<String>, message: impl Into<String>, author: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      message: message.into(),
      author: author.into(),
      author_email: String::new(),
    }
  }
}

/// A project contributor as known to the issue tracker
///
/// Equality and hashing cover every field. GitHub allows accounts without a
/// public display name, so `name` may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Contributor {
  #[serde(default)]
  pub name: String,
  pub login: String,
  pub profile_url: String,
  pub number_of_contributions: u32,
}

impl Contributor {
  pub fn new(
    name: impl Into<String>,
    login: impl Into<String>,
    profile_url: impl Into<String>,
    number_of_contributions: u32,
  ) -> Self {
    Self {
      name: name.into(),
      login: login.into(),
      profile_url: profile_url.into(),
      number_of_contributions,
    }
  }

  /// Name to show in notes, falling back to the login
  pub fn display_name(&self) -> &str {
    if self.name.is_empty() { &self.login } else { &self.name }
  }
}

/// A closed issue or merged pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Improvement {
  pub id: u64,
  pub title: String,
  pub url: String,
  #[serde(default)]
  pub labels: Vec<String>,
  #[serde(default)]
  pub author: Option<String>,
  #[serde(default)]
  pub is_pull_request: bool,
  #[serde(default)]
  pub closed_at: Option<DateTime<Utc>>,
}

impl Improvement {
  pub fn has_any_label(&self, labels: &[String]) -> bool {
    self.labels.iter().any(|l| labels.contains(l))
  }
}

/// Commits of one author within one version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contribution {
  pub author: String,
  #[serde(default)]
  pub author_email: String,
  pub commits: Vec<Commit>,
  /// Matched contributor profile, if the author is known
  #[serde(default)]
  pub contributor: Option<Contributor>,
}

/// Everything the formatters need to know about one version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseNotesData {
  pub version: String,
  pub version_tag: String,
  #[serde(default)]
  pub previous_version_tag: Option<String>,
  #[serde(default)]
  pub release_date: Option<DateTime<Utc>>,
  #[serde(default)]
  pub contributions: Vec<Contribution>,
  #[serde(default)]
  pub improvements: Vec<Improvement>,
}

impl ReleaseNotesData {
  pub fn commit_count(&self) -> usize {
    self.contributions.iter().map(|c| c.commits.len()).sum()
  }

  pub fn author_count(&self) -> usize {
    self.contributions.len()
  }
}
