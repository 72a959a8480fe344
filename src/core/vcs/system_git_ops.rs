//! Release operations for SystemGit (tags, history ranges, commit and push)

use super::system_git::SystemGit;
use crate::core::error::{GitError, HeraldError, HeraldResult};
use crate::core::exec::ProcessRunner;
use crate::notes::model::Commit;
use crate::notes::sources::{CommitSource, ReleaseDateSource};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

const FIELD_SEP: char = '\x1f';
const RECORD_SEP: char = '\x1e';

impl SystemGit {
  /// Versions tagged with `prefix`, newest first; tags that are not semver are skipped
  pub fn tags_with_prefix(&self, prefix: &str) -> HeraldResult<Vec<String>> {
    let pattern = format!("{}*", prefix);
    let output = self.run(&["tag", "--list", &pattern])?;
    Ok(sort_versions(output.lines(), prefix))
  }

  /// Newest tagged version strictly older than `version`
  pub fn previous_version_before(&self, prefix: &str, version: &str) -> HeraldResult<Option<String>> {
    let current = semver::Version::parse(version)
      .map_err(|e| HeraldError::invalid_config("project.version", format!("'{}' is not semver: {}", version, e)))?;
    Ok(
      self
        .tags_with_prefix(prefix)?
        .into_iter()
        .find(|v| semver::Version::parse(v).map(|v| v < current).unwrap_or(false)),
    )
  }

  pub fn tag_exists(&self, tag: &str) -> bool {
    self
      .git_cmd()
      .args(["rev-parse", "--verify", "--quiet", &format!("refs/tags/{}", tag)])
      .output()
      .map(|o| o.status.success())
      .unwrap_or(false)
  }

  /// Stage the given files and commit them
  pub fn commit_files(&self, files: &[&Path], message: &str) -> HeraldResult<String> {
    let mut add = self.git_cmd();
    add.arg("add").arg("--");
    for file in files {
      add.arg(file);
    }
    let output = add.output()?;
    if !output.status.success() {
      return Err(HeraldError::Git(GitError::CommandFailed {
        command: "git add".to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
      }));
    }

    self.run(&["commit", "-m", message])?;
    self.head_commit()
  }

  /// Create a lightweight tag at HEAD
  pub fn create_tag(&self, tag: &str) -> HeraldResult<()> {
    self.run(&["tag", tag])?;
    Ok(())
  }

  /// Push refs through the masking runner, the URL may carry a token
  pub fn push(
    &self,
    runner: &ProcessRunner,
    remote_url: &str,
    refs: &[String],
    dry_run: bool,
    token_set: bool,
  ) -> HeraldResult<String> {
    let mut args: Vec<String> = vec!["git".to_string(), "push".to_string(), remote_url.to_string()];
    args.extend(refs.iter().cloned());
    if dry_run {
      args.push("--dry-run".to_string());
    }

    let output = runner.run_unchecked(&args)?;
    if !output.success {
      return Err(HeraldError::Git(GitError::PushFailed {
        remote: runner.masker().mask(remote_url),
        branch: refs.join(" "),
        reason: output.output,
        token_set,
      }));
    }
    Ok(output.output)
  }
}

impl CommitSource for SystemGit {
  fn commits_between(&self, from: &str, to: &str) -> HeraldResult<Vec<Commit>> {
    let range = format!("{}..{}", from, to);
    let format = format!("--format=%H{0}%an{0}%ae{0}%B{1}", FIELD_SEP, RECORD_SEP);
    let output = self
      .git_cmd()
      .args(["log", "--no-color", &format, &range])
      .output()?;

    if !output.status.success() {
      return Err(HeraldError::Git(GitError::CommandFailed {
        command: format!("git log {}", range),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
      }));
    }

    let commits = parse_log(&String::from_utf8_lossy(&output.stdout));
    debug!("{} commits in {}", commits.len(), range);
    Ok(commits)
  }

  fn contributions_since(&self, from: &str) -> HeraldResult<BTreeMap<String, u32>> {
    let range = format!("{}..HEAD", from);
    let output = self.run(&["shortlog", "--summary", "--numbered", &range])?;
    Ok(parse_shortlog(&output))
  }
}

impl ReleaseDateSource for SystemGit {
  fn release_date(&self, tag: &str) -> Option<DateTime<Utc>> {
    let reference = format!("refs/tags/{}", tag);
    let timestamp = self.run(&["log", "-1", "--format=%ct", &reference]).ok()?;
    timestamp.parse::<i64>().ok().and_then(|ts| DateTime::from_timestamp(ts, 0))
  }
}

/// Parse `%H %an %ae %B` records separated by RS, fields by US
fn parse_log(output: &str) -> Vec<Commit> {
  output
    .split(RECORD_SEP)
    .filter_map(|record| {
      let record = record.trim_start_matches('\n');
      let mut fields = record.splitn(4, FIELD_SEP);
      let id = fields.next()?.trim();
      if id.is_empty() {
        return None;
      }
      let author = fields.next()?;
      let author_email = fields.next()?;
      let message = fields.next().unwrap_or("").trim();
      Some(Commit {
        id: id.to_string(),
        message: message.to_string(),
        author: author.to_string(),
        author_email: author_email.to_string(),
      })
    })
    .collect()
}

/// Parse `git shortlog --summary` lines, `<count>\t<author>`
fn parse_shortlog(output: &str) -> BTreeMap<String, u32> {
  output
    .lines()
    .filter_map(|line| {
      let (count, author) = line.trim().split_once('\t')?;
      Some((author.trim().to_string(), count.trim().parse().ok()?))
    })
    .collect()
}

/// Strip `prefix`, keep semver versions, newest first
fn sort_versions<'a>(tags: impl Iterator<Item = &'a str>, prefix: &str) -> Vec<String> {
  let mut versions: Vec<semver::Version> = tags
    .filter_map(|t| t.trim().strip_prefix(prefix))
    .filter_map(|v| semver::Version::parse(v).ok())
    .collect();
  versions.sort_by(|a, b| b.cmp(a));
  versions.into_iter().map(|v| v.to_string()).collect()
}
