//! Versioned JSON persistence for the fetch → format hand-off

use crate::core::error::{HeraldError, HeraldResult, ResultExt};
use crate::notes::contributors::ContributorSet;
use crate::notes::model::{Contributor, ReleaseNotesData};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Current envelope format
pub const FORMAT_VERSION: u32 = 1;

pub const RELEASE_NOTES_FILE: &str = "release-notes.json";
pub const NOTABLE_RELEASE_NOTES_FILE: &str = "notable-release-notes.json";
pub const CONTRIBUTORS_FILE: &str = "contributors.json";

#[derive(Serialize, Deserialize)]
struct ReleasesEnvelope {
  format: u32,
  releases: Vec<ReleaseNotesData>,
}

#[derive(Serialize, Deserialize)]
struct ContributorsEnvelope {
  format: u32,
  contributors: Vec<Contributor>,
}

/// Only `format` is read first so unknown versions get a clear error
#[derive(Deserialize)]
struct FormatHeader {
  format: u32,
}

fn check_format(json: &str) -> HeraldResult<()> {
  let header: FormatHeader = serde_json::from_str(json)?;
  if header.format != FORMAT_VERSION {
    return Err(HeraldError::with_help(
      format!(
        "Unsupported data format {} (expected {})",
        header.format, FORMAT_VERSION
      ),
      "The file was written by a different cargo-herald version, fetch the data again",
    ));
  }
  Ok(())
}

pub fn releases_to_json(releases: &[ReleaseNotesData]) -> HeraldResult<String> {
  let envelope = ReleasesEnvelope {
    format: FORMAT_VERSION,
    releases: releases.to_vec(),
  };
  Ok(serde_json::to_string_pretty(&envelope)?)
}

pub fn releases_from_json(json: &str) -> HeraldResult<Vec<ReleaseNotesData>> {
  check_format(json)?;
  let envelope: ReleasesEnvelope = serde_json::from_str(json)?;
  Ok(envelope.releases)
}

pub fn contributors_to_json(contributors: &ContributorSet) -> HeraldResult<String> {
  let envelope = ContributorsEnvelope {
    format: FORMAT_VERSION,
    contributors: contributors.all_sorted().to_vec(),
  };
  Ok(serde_json::to_string_pretty(&envelope)?)
}

pub fn contributors_from_json(json: &str) -> HeraldResult<ContributorSet> {
  check_format(json)?;
  let envelope: ContributorsEnvelope = serde_json::from_str(json)?;
  Ok(envelope.contributors.into_iter().collect())
}

fn write_file(path: &Path, content: &str) -> HeraldResult<()> {
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
  }
  fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

fn read_file(path: &Path) -> HeraldResult<String> {
  fs::read_to_string(path).map_err(|e| {
    HeraldError::with_help(
      format!("Failed to read {}: {}", path.display(), e),
      "Run `cargo herald notes fetch` first",
    )
  })
}

pub fn write_releases(path: &Path, releases: &[ReleaseNotesData]) -> HeraldResult<()> {
  write_file(path, &releases_to_json(releases)?)
}

pub fn read_releases(path: &Path) -> HeraldResult<Vec<ReleaseNotesData>> {
  releases_from_json(&read_file(path)?).with_context(|| format!("Invalid release notes data in {}", path.display()))
}

pub fn write_contributors(path: &Path, contributors: &ContributorSet) -> HeraldResult<()> {
  write_file(path, &contributors_to_json(contributors)?)
}

/// Cached contributors, an empty set when nothing was fetched yet
pub fn read_contributors(path: &Path) -> HeraldResult<ContributorSet> {
  if !path.exists() {
    return Ok(ContributorSet::new());
  }
  contributors_from_json(&read_file(path)?).with_context(|| format!("Invalid contributors data in {}", path.display()))
}
