//! Per-version aggregation of commits, improvements and contributors

use crate::core::error::{HeraldError, HeraldResult};
use crate::notes::contributors::ContributorMap;
use crate::notes::filter::CommitFilter;
use crate::notes::model::{Commit, Contribution, Improvement, ReleaseNotesData};
use crate::notes::sources::{CommitSource, IssueSource, ReleaseDateSource};
use tracing::debug;

/// What to aggregate
#[derive(Debug, Clone)]
pub struct NotesRequest {
  /// Versions to produce notes for, newest first
  pub versions: Vec<String>,
  /// Last version before the oldest requested one
  pub since: String,
  pub tag_prefix: String,
  /// Only improvements carrying one of these labels; everything when empty
  pub labels: Vec<String>,
  pub only_pull_requests: bool,
  /// Ref used for a version that is not tagged yet
  pub head_ref: String,
}

impl NotesRequest {
  fn validate(&self) -> HeraldResult<()> {
    if self.versions.is_empty() || self.versions.iter().any(|v| v.trim().is_empty()) {
      return Err(HeraldError::invalid_config(
        "project.version",
        "at least one non-empty version is required to build release notes",
      ));
    }
    if self.since.trim().is_empty() {
      return Err(HeraldError::invalid_config(
        "project.previous_version",
        "the previous released version is required to build release notes",
      ));
    }
    Ok(())
  }
}

/// Combines the data sources into [`ReleaseNotesData`] per version
pub struct NotesAggregator<'a> {
  commits: &'a dyn CommitSource,
  dates: &'a dyn ReleaseDateSource,
  issues: &'a dyn IssueSource,
  filter: &'a dyn CommitFilter,
  contributors: &'a ContributorMap,
}

impl<'a> NotesAggregator<'a> {
  pub fn new(
    commits: &'a dyn CommitSource,
    dates: &'a dyn ReleaseDateSource,
    issues: &'a dyn IssueSource,
    filter: &'a dyn CommitFilter,
    contributors: &'a ContributorMap,
  ) -> Self {
    Self {
      commits,
      dates,
      issues,
      filter,
      contributors,
    }
  }

  /// Release notes data for every requested version, newest first
  pub fn aggregate(&self, request: &NotesRequest) -> HeraldResult<Vec<ReleaseNotesData>> {
    request.validate()?;

    // Oldest first while walking ranges, reversed at the end
    let mut chain: Vec<&str> = Vec::with_capacity(request.versions.len() + 1);
    chain.push(&request.since);
    chain.extend(request.versions.iter().rev().map(String::as_str));

    let mut out = Vec::with_capacity(request.versions.len());
    for pair in chain.windows(2) {
      out.push(self.aggregate_version(request, pair[0], pair[1])?);
    }
    out.reverse();
    Ok(out)
  }

  fn aggregate_version(&self, request: &NotesRequest, previous: &str, version: &str) -> HeraldResult<ReleaseNotesData> {
    let previous_tag = format!("{}{}", request.tag_prefix, previous);
    let version_tag = format!("{}{}", request.tag_prefix, version);

    let since_date = self.dates.release_date(&previous_tag);
    let release_date = self.dates.release_date(&version_tag);
    let to_ref = if release_date.is_some() {
      version_tag.as_str()
    } else {
      debug!("No tag {} yet, using {}", version_tag, request.head_ref);
      request.head_ref.as_str()
    };

    let commits: Vec<Commit> = self
      .commits
      .commits_between(&previous_tag, to_ref)?
      .into_iter()
      .filter(|c| !self.filter.is_excluded(c))
      .collect();

    let improvements: Vec<Improvement> = self
      .issues
      .closed_improvements(&request.labels, since_date, release_date)?
      .into_iter()
      .filter(|i| request.labels.is_empty() || i.has_any_label(&request.labels))
      .filter(|i| !request.only_pull_requests || i.is_pull_request)
      .collect();

    debug!(
      "{}: {} commits, {} improvements",
      version,
      commits.len(),
      improvements.len()
    );

    Ok(ReleaseNotesData {
      version: version.to_string(),
      version_tag,
      previous_version_tag: Some(previous_tag),
      release_date,
      contributions: self.group_by_author(commits),
      improvements,
    })
  }

  /// Group commits by author, in order of first appearance
  fn group_by_author(&self, commits: Vec<Commit>) -> Vec<Contribution> {
    let mut contributions: Vec<Contribution> = Vec::new();
    for commit in commits {
      match contributions.iter_mut().find(|c| c.author == commit.author) {
        Some(contribution) => contribution.commits.push(commit),
        None => {
          let contributor = self.contributors.get(&commit.author).cloned();
          if contributor.is_none() {
            debug!("No contributor profile for {}", commit.author);
          }
          contributions.push(Contribution {
            author: commit.author.clone(),
            author_email: commit.author_email.clone(),
            commits: vec![commit],
            contributor,
          });
        }
      }
    }
    contributions
  }
}
