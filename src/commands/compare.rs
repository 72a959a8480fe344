//! Publication comparison command

use crate::compare::fetch::HttpFetcher;
use crate::compare::{ArtifactDescriptor, ComparisonOutcome, PreviousRelease, PublicationComparator};
use crate::core::config::expand_template;
use crate::core::context::HeraldContext;
use crate::core::error::HeraldResult;
use std::path::Path;
use tracing::{info, warn};

/// Compare every configured publication against the previous release
pub fn compare_publications(
  ctx: &HeraldContext,
  previous_version: Option<String>,
) -> HeraldResult<Vec<(String, ComparisonOutcome)>> {
  let publications = &ctx.config.publications;
  if publications.is_empty() {
    warn!("No publications configured, nothing to compare");
    return Ok(Vec::new());
  }

  let version = ctx.version()?;
  let previous_version = match previous_version {
    Some(v) => Some(v),
    None => ctx.previous_version(&ctx.git()?, &version)?,
  };
  let fetcher = HttpFetcher::new(ctx.masker())?;

  let mut outcomes = Vec::with_capacity(publications.len());
  for publication in publications {
    let name = ctx.artifact_name(publication.name.as_deref())?;
    let group = publication.group.as_str();
    let current = |template: &str, remote: Option<&str>| ArtifactDescriptor {
      group: group.to_string(),
      name: name.clone(),
      version: version.clone(),
      local_path: ctx.resolve(Path::new(&expand_template(template, group, &name, &version))),
      remote_url: remote.map(|t| expand_template(t, group, &name, &version)),
    };

    let previous = previous_version.as_ref().map(|prev| PreviousRelease {
      version: prev.clone(),
      metadata_url: publication
        .previous_metadata_url
        .as_deref()
        .map(|t| expand_template(t, group, &name, prev)),
      archive_url: publication
        .previous_archive_url
        .as_deref()
        .map(|t| expand_template(t, group, &name, prev)),
    });

    let metadata = current(&publication.metadata, publication.previous_metadata_url.as_deref());
    let archive = current(&publication.archive, publication.previous_archive_url.as_deref());
    let mut comparator = PublicationComparator::new(&fetcher, metadata, archive, previous);
    let outcome = *comparator.compare()?;
    info!("{} {}: equal = {}", comparator.name(), version, comparator.is_equal());
    outcomes.push((name, outcome));
  }
  Ok(outcomes)
}

pub fn run_compare(ctx: &HeraldContext, previous_version: Option<String>) -> HeraldResult<()> {
  let outcomes = compare_publications(ctx, previous_version)?;
  if outcomes.is_empty() {
    println!("⚠️  No publications configured in herald.toml");
    return Ok(());
  }

  for (name, outcome) in &outcomes {
    let icon = if outcome.equal { "🟰" } else { "🆕" };
    println!(
      "{} {}: metadata equal: {}, archive equal: {}, publications equal: {}",
      icon, name, outcome.metadata_equal, outcome.archive_equal, outcome.equal
    );
  }
  Ok(())
}
