//! Release notes rendering
//!
//! Formatters are pure: the same data and contributor map always render the
//! same text. Label groups follow the configured mapping order, never the order
//! the issue tracker returned labels in.

use crate::notes::contributors::ContributorMap;
use crate::notes::model::{Contribution, Improvement, ReleaseNotesData};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

const NO_IMPROVEMENTS: &str = " - No pull requests referenced in commit messages.";

/// Ordered label → section title mapping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelMapping {
  entries: Vec<(String, String)>,
}

impl LabelMapping {
  pub fn new() -> Self {
    Self::default()
  }

  /// Add a mapping, replacing the title of an existing label in place
  pub fn insert(&mut self, label: impl Into<String>, title: impl Into<String>) {
    let (label, title) = (label.into(), title.into());
    match self.entries.iter_mut().find(|(l, _)| *l == label) {
      Some(entry) => entry.1 = title,
      None => self.entries.push((label, title)),
    }
  }

  pub fn get(&self, label: &str) -> Option<&str> {
    self
      .entries
      .iter()
      .find(|(l, _)| l == label)
      .map(|(_, title)| title.as_str())
  }

  pub fn iter(&self) -> impl Iterator<Item = &(String, String)> {
    self.entries.iter()
  }

  /// First label of the improvement that has a section, in the improvement's label order
  fn section_of<'a>(&self, improvement: &'a Improvement) -> Option<&'a str> {
    improvement.labels.iter().find(|l| self.get(l).is_some()).map(String::as_str)
  }
}

impl FromIterator<(String, String)> for LabelMapping {
  fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
    let mut mapping = LabelMapping::new();
    for (label, title) in iter {
      mapping.insert(label, title);
    }
    mapping
  }
}

/// What happens to improvements carrying none of the mapped labels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnmappedLabels {
  /// Listed after all mapped sections, without a title prefix
  #[default]
  Other,
  /// Left out of the notes
  Drop,
}

/// Renders release notes data into text
pub trait NotesFormatter {
  fn format(&self, data: &[ReleaseNotesData], contributors: &ContributorMap) -> String;
}

/// Expand `{previous}` and `{current}` in a compare link template
pub fn compare_link(template: &str, previous_tag: &str, current_tag: &str) -> String {
  template.replace("{previous}", previous_tag).replace("{current}", current_tag)
}

/// GitHub compare link template for a repository
pub fn github_compare_template(repository: &str) -> String {
  format!("https://github.com/{}/compare/{{previous}}...{{current}}", repository)
}

fn format_date(data: &ReleaseNotesData) -> Option<String> {
  data.release_date.map(|d| d.format("%Y-%m-%d").to_string())
}

fn plural(count: usize, singular: &str) -> String {
  if count == 1 {
    format!("{} {}", count, singular)
  } else {
    format!("{} {}s", count, singular)
  }
}

fn version_compare_link(template: &str, data: &ReleaseNotesData) -> Option<String> {
  data
    .previous_version_tag
    .as_deref()
    .map(|previous| compare_link(template, previous, &data.version_tag))
}

fn commits_text(template: &str, data: &ReleaseNotesData) -> String {
  let text = plural(data.commit_count(), "commit");
  match version_compare_link(template, data) {
    Some(link) => format!("[{}]({})", text, link),
    None => text,
  }
}

fn author_text(contribution: &Contribution, contributors: &ContributorMap) -> String {
  match contribution
    .contributor
    .as_ref()
    .or_else(|| contributors.get(&contribution.author))
  {
    Some(contributor) => format!("[{}]({})", contribution.author, contributor.profile_url),
    None => contribution.author.clone(),
  }
}

fn improvement_line(improvement: &Improvement, title: Option<&str>) -> String {
  let prefix = title.map(|t| format!("[{}] ", t)).unwrap_or_default();
  format!(
    " - {}{} [(#{})]({})",
    prefix, improvement.title, improvement.id, improvement.url
  )
}

/// Full per-version notes grouped by label
#[derive(Debug, Clone)]
pub struct DetailedFormatter {
  pub label_mapping: LabelMapping,
  pub compare_link_template: String,
  pub publication_repository: Option<String>,
  pub unmapped: UnmappedLabels,
}

impl DetailedFormatter {
  fn header(&self, data: &ReleaseNotesData, contributors: &ContributorMap) -> String {
    let mut header = format!("**{}", data.version);
    if let Some(date) = format_date(data) {
      let _ = write!(header, " ({})", date);
    }
    header.push_str("**");

    if data.commit_count() == 0 {
      header.push_str(" - no code changes (no commits)");
    } else {
      let authors: Vec<String> = data
        .contributions
        .iter()
        .map(|c| author_text(c, contributors))
        .collect();
      let _ = write!(
        header,
        " - {} by {}",
        commits_text(&self.compare_link_template, data),
        authors.join(", ")
      );
    }

    if let Some(repository) = &self.publication_repository {
      let _ = write!(header, " - published to {}", repository);
    }
    header
  }

  fn improvement_lines(&self, improvements: &[Improvement]) -> Vec<String> {
    let mut lines = Vec::new();
    for (label, title) in self.label_mapping.iter() {
      for improvement in improvements {
        if self.label_mapping.section_of(improvement) == Some(label.as_str()) {
          lines.push(improvement_line(improvement, Some(title)));
        }
      }
    }
    if self.unmapped == UnmappedLabels::Other {
      for improvement in improvements {
        if self.label_mapping.section_of(improvement).is_none() {
          lines.push(improvement_line(improvement, None));
        }
      }
    }
    lines
  }
}

impl NotesFormatter for DetailedFormatter {
  fn format(&self, data: &[ReleaseNotesData], contributors: &ContributorMap) -> String {
    let mut out = String::new();
    for (i, release) in data.iter().enumerate() {
      if i > 0 {
        out.push('\n');
      }
      out.push_str(&self.header(release, contributors));
      out.push('\n');

      let lines = self.improvement_lines(&release.improvements);
      if lines.is_empty() {
        out.push_str(NO_IMPROVEMENTS);
        out.push('\n');
      }
      for line in lines {
        out.push_str(&line);
        out.push('\n');
      }
    }
    out
  }
}

/// Cross-version digest of noteworthy improvements
#[derive(Debug, Clone)]
pub struct NotableFormatter {
  pub introduction: String,
  pub compare_link_template: String,
  pub detailed_notes_link: String,
}

impl NotesFormatter for NotableFormatter {
  fn format(&self, data: &[ReleaseNotesData], _contributors: &ContributorMap) -> String {
    let mut out = self.introduction.clone();
    for release in data {
      let _ = write!(out, "### {}", release.version);
      if let Some(date) = format_date(release) {
        let _ = write!(out, " ({})", date);
      }
      out.push_str("\n\n");

      let _ = writeln!(
        out,
        "{} by {}\n",
        commits_text(&self.compare_link_template, release),
        plural(release.author_count(), "author")
      );
      if release.improvements.is_empty() {
        out.push_str(NO_IMPROVEMENTS);
        out.push('\n');
      }
      for improvement in &release.improvements {
        out.push_str(&improvement_line(improvement, None));
        out.push('\n');
      }
      out.push('\n');
    }
    let _ = writeln!(out, "Detailed release notes: {}", self.detailed_notes_link);
    out
  }
}
