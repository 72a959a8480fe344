//! Release notes commands: fetch, contributors, preview, update, notable

use crate::core::context::HeraldContext;
use crate::core::error::{HeraldError, HeraldResult, ResultExt};
use crate::github::GitHubClient;
use crate::notes::contributors::{ContributorMap, ContributorSet, contributors_for_team};
use crate::notes::filter::{CommitFilter, KeepAll};
use crate::notes::format::{DetailedFormatter, NotableFormatter, NotesFormatter, github_compare_template};
use crate::notes::serialize::{self, CONTRIBUTORS_FILE, NOTABLE_RELEASE_NOTES_FILE, RELEASE_NOTES_FILE};
use crate::notes::sources::{CommitSource, ContributorSource};
use crate::notes::{NotesAggregator, NotesRequest};
use std::fs;
use tracing::{debug, info, warn};

const HEAD_REF: &str = "HEAD";

fn contributors(ctx: &HeraldContext) -> HeraldResult<ContributorMap> {
  let cache = ctx.data_file(CONTRIBUTORS_FILE);
  contributors_for_team(&ctx.config.team, || serialize::read_contributors(&cache))
}

/// Versions for the cross-version digest: every tagged version plus the one
/// being released, newest first; the oldest one is the starting point.
fn notable_versions(tags: Vec<String>, version: &str) -> HeraldResult<(Vec<String>, String)> {
  let mut versions = tags;
  if !versions.iter().any(|v| v == version) {
    versions.insert(0, version.to_string());
  }
  let since = versions.pop().filter(|_| !versions.is_empty()).ok_or_else(|| {
    HeraldError::with_help(
      "Notable release notes need at least one released version",
      "Tag a previous release first, e.g. `git tag v0.1.0`",
    )
  })?;
  Ok((versions, since))
}

/// Aggregate notes data and persist it for the formatting stage
pub fn run_notes_fetch(ctx: &HeraldContext, notable: bool) -> HeraldResult<()> {
  let repository = ctx.config.github.require_repository()?;
  let git = ctx.git()?;
  let version = ctx.version()?;
  let tag_prefix = ctx.config.git.tag_prefix.clone();

  let (versions, since, labels) = if notable {
    let (versions, since) = notable_versions(git.tags_with_prefix(&tag_prefix)?, &version)?;
    (versions, since, vec![ctx.config.release_notes.noteworthy_label.clone()])
  } else {
    let since = ctx.previous_version(&git, &version)?.unwrap_or_default();
    (vec![version.clone()], since, Vec::new())
  };

  let request = NotesRequest {
    versions,
    since,
    tag_prefix,
    labels,
    only_pull_requests: false,
    head_ref: HEAD_REF.to_string(),
  };

  let github = GitHubClient::new(&ctx.config.github.api_url, repository, ctx.read_token())?;
  let contributors = contributors(ctx)?;
  let postfix = ctx.config.git.commit_filter();
  let filter: &dyn CommitFilter = match &postfix {
    Some(filter) => filter,
    None => &KeepAll,
  };

  let aggregator = NotesAggregator::new(&git, &git, &github, filter, &contributors);
  let releases = aggregator.aggregate(&request)?;

  let file = if notable {
    NOTABLE_RELEASE_NOTES_FILE
  } else {
    RELEASE_NOTES_FILE
  };
  let path = ctx.data_file(file);
  serialize::write_releases(&path, &releases)?;

  println!("✅ Release notes data for {} version(s) written to {}", releases.len(), path.display());
  Ok(())
}

/// Fetch all GitHub contributors into the data directory
pub fn run_notes_contributors(ctx: &HeraldContext) -> HeraldResult<()> {
  if !ctx.config.team.contributors.is_empty() {
    println!("⏭️  Contributors are configured in herald.toml, skipping the GitHub fetch");
    return Ok(());
  }

  let repository = ctx.config.github.require_repository()?;
  let github = GitHubClient::new(&ctx.config.github.api_url, repository, ctx.read_token())?;
  let contributors = github.all_contributors()?;
  if contributors.is_empty() {
    warn!("GitHub returned no contributors for {}", repository);
  }
  for notation in contributors.to_compact_notation() {
    info!("  {}", notation);
  }

  let path = ctx.data_file(CONTRIBUTORS_FILE);
  serialize::write_contributors(&path, &contributors)?;
  println!("✅ {} contributors written to {}", contributors.len(), path.display());

  if let Err(err) = report_unknown_authors(ctx, &contributors) {
    debug!("Skipping the author check: {}", err);
  }
  Ok(())
}

/// Warn about authors since the previous release that no GitHub profile matches
fn report_unknown_authors(ctx: &HeraldContext, contributors: &ContributorSet) -> HeraldResult<()> {
  let git = ctx.git()?;
  let version = ctx.version()?;
  let Some(previous) = ctx.previous_version(&git, &version)? else {
    return Ok(());
  };

  let since = ctx.config.git.tag_for(&previous);
  for (author, commits) in git.contributions_since(&since)? {
    if contributors.find_by_name(&author).is_none() {
      warn!(
        "{} ({} commit(s) since {}) has no GitHub contributor profile, notes will show the plain name",
        author, commits, since
      );
    }
  }
  Ok(())
}

fn detailed_notes(ctx: &HeraldContext) -> HeraldResult<String> {
  let repository = ctx.config.github.require_repository()?;
  let releases = serialize::read_releases(&ctx.data_file(RELEASE_NOTES_FILE))?;
  let notes_config = &ctx.config.release_notes;

  let formatter = DetailedFormatter {
    label_mapping: notes_config.label_mapping(),
    compare_link_template: github_compare_template(repository),
    publication_repository: notes_config.publication_repository.clone(),
    unmapped: notes_config.unmapped_labels,
  };
  Ok(formatter.format(&releases, &contributors(ctx)?))
}

/// Print the detailed notes without touching any file
pub fn run_notes_preview(ctx: &HeraldContext) -> HeraldResult<()> {
  let notes = detailed_notes(ctx)?;
  println!("----------------");
  print!("{}", notes);
  println!("----------------");
  Ok(())
}

/// Prepend the detailed notes to the release notes file
pub fn run_notes_update(ctx: &HeraldContext) -> HeraldResult<()> {
  let path = ctx.resolve(ctx.config.release_notes.require_file()?);
  let notes = detailed_notes(ctx)?;

  let existing = if path.exists() {
    fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?
  } else {
    String::new()
  };
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent)?;
  }
  fs::write(&path, format!("{}\n{}", notes, existing)).with_context(|| format!("Failed to write {}", path.display()))?;

  info!("Prepended {} bytes to {}", notes.len(), path.display());
  println!("✅ Updated {}", path.display());
  Ok(())
}

/// Rewrite the notable release notes file
pub fn run_notes_notable(ctx: &HeraldContext) -> HeraldResult<()> {
  let repository = ctx.config.github.require_repository()?;
  let notes_config = &ctx.config.release_notes;
  let notable_path = ctx.resolve(notes_config.require_notable_file()?);
  let detailed_file = notes_config.require_file()?;
  let releases = serialize::read_releases(&ctx.data_file(NOTABLE_RELEASE_NOTES_FILE))?;

  let formatter = NotableFormatter {
    introduction: notes_config.notable_introduction.clone(),
    compare_link_template: github_compare_template(repository),
    detailed_notes_link: format!(
      "https://github.com/{}/blob/{}/{}",
      repository,
      ctx.config.git.branch,
      detailed_file.display()
    ),
  };
  let notes = formatter.format(&releases, &contributors(ctx)?);

  if let Some(parent) = notable_path.parent() {
    fs::create_dir_all(parent)?;
  }
  fs::write(&notable_path, notes).with_context(|| format!("Failed to write {}", notable_path.display()))?;
  println!("✅ Updated {}", notable_path.display());
  Ok(())
}
