//! Content comparison of `.crate` (tar.gz) source archives

use crate::compare::metadata::normalize_versions;
use crate::core::error::{HeraldResult, ResultExt};
use flate2::read::GzDecoder;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// Entries regenerated on every package run, never part of the comparison
const VOLATILE_ENTRIES: &[&str] = &[".cargo_vcs_info.json"];

/// Normalized entry path → sha256 of its (version-normalized) content
pub type ArchiveDigest = BTreeMap<String, String>;

/// Drop a leading `{name}-{version}/` directory
fn strip_versioned_root(path: &str, version: &str) -> String {
  match path.split_once('/') {
    Some((root, rest)) if root.ends_with(&format!("-{}", version)) => rest.to_string(),
    _ => path.to_string(),
  }
}

fn content_digest(content: &[u8], version: &str) -> String {
  // Text files commonly embed the version (Cargo.toml), binary content is hashed as is
  let digest = match std::str::from_utf8(content) {
    Ok(text) => Sha256::digest(normalize_versions(text, &[version]).as_bytes()),
    Err(_) => Sha256::digest(content),
  };
  format!("{:x}", digest)
}

/// Digest every regular file of a gzipped tarball
pub fn archive_digest(path: &Path, version: &str) -> HeraldResult<ArchiveDigest> {
  let file = File::open(path).with_context(|| format!("Failed to open archive {}", path.display()))?;
  let mut archive = tar::Archive::new(GzDecoder::new(file));
  let mut out = ArchiveDigest::new();

  let entries = archive
    .entries()
    .with_context(|| format!("Failed to read archive {}", path.display()))?;
  for entry in entries {
    let mut entry = entry.with_context(|| format!("Corrupt entry in {}", path.display()))?;
    if !entry.header().entry_type().is_file() {
      continue;
    }
    let entry_path = entry.path()?.to_string_lossy().replace('\\', "/");
    let name = strip_versioned_root(&entry_path, version);
    if VOLATILE_ENTRIES.contains(&name.as_str()) {
      continue;
    }

    let mut content = Vec::new();
    std::io::Read::read_to_end(&mut entry, &mut content)?;
    out.insert(name, content_digest(&content, version));
  }

  debug!("{} entries in {}", out.len(), path.display());
  Ok(out)
}

/// Whether two archives hold the same files with the same content
pub fn archives_equal(current: &Path, current_version: &str, previous: &Path, previous_version: &str) -> HeraldResult<bool> {
  let current = archive_digest(current, current_version)?;
  let previous = archive_digest(previous, previous_version)?;

  if current != previous {
    for (name, digest) in &current {
      match previous.get(name) {
        None => debug!("Added: {}", name),
        Some(other) if other != digest => debug!("Changed: {}", name),
        _ => {}
      }
    }
    for name in previous.keys().filter(|n| !current.contains_key(*n)) {
      debug!("Removed: {}", name);
    }
    return Ok(false);
  }
  Ok(true)
}
