//! `cargo herald init`: write a starter herald.toml

use crate::core::config::HeraldConfig;
use crate::core::error::{HeraldResult, ResultExt};
use crate::core::vcs::SystemGit;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

const CONFIG_FILE: &str = "herald.toml";
const ORIGIN: &str = "origin";
const FALLBACK_BRANCH: &str = "master";

/// Create herald.toml unless a configuration already exists
pub fn run_init(workspace_root: &Path) -> HeraldResult<()> {
  if let Some(existing) = HeraldConfig::find_config_path(workspace_root) {
    println!("⏭️  Configuration already exists, nothing to do: {}", existing.display());
    return Ok(());
  }

  let git = SystemGit::open(workspace_root).ok();
  let repository = git
    .as_ref()
    .and_then(|git| git.remote_url(ORIGIN).ok())
    .and_then(|url| repository_from_remote(&url));
  if repository.is_none() {
    warn!("No GitHub repository found for remote '{}', set github.repository by hand", ORIGIN);
  }
  let branch = git
    .as_ref()
    .and_then(|git| git.current_branch().ok())
    .filter(|branch| branch != "HEAD")
    .unwrap_or_else(|| FALLBACK_BRANCH.to_string());
  debug!("Starter config for {:?} on {}", repository, branch);

  let path = workspace_root.join(CONFIG_FILE);
  fs::write(&path, starter_config(repository.as_deref(), &branch))
    .with_context(|| format!("Failed to write {}", path.display()))?;

  println!("✅ Created {}", path.display());
  println!("   Please review it before committing");
  Ok(())
}

/// `owner/repo` of a GitHub remote, https or ssh, with or without credentials
fn repository_from_remote(url: &str) -> Option<String> {
  let (_, path) = url.trim().split_once("github.com")?;
  let path = path
    .trim_start_matches([':', '/'])
    .trim_end_matches('/')
    .trim_end_matches(".git");

  let mut segments = path.split('/');
  let (owner, repo) = (segments.next()?, segments.next()?);
  if owner.is_empty() || repo.is_empty() || segments.next().is_some() {
    return None;
  }
  Some(format!("{}/{}", owner, repo))
}

fn starter_config(repository: Option<&str>, branch: &str) -> String {
  let repository = match repository {
    Some(repository) => format!("repository = \"{}\"", repository),
    None => "# repository = \"owner/repo\"".to_string(),
  };

  format!(
    r#"# cargo-herald configuration, created by `cargo herald init`.
# This file is meant to be checked in.

[github]
{repository}
# Env variables holding the tokens, never the tokens themselves
# read_token_env = "GH_READ_TOKEN"
# write_token_env = "GH_WRITE_TOKEN"

[git]
branch = "{branch}"
releasable_branch_regex = "{branch}|release/.+"
commit_message_postfix = "[ci skip]"

[release_notes]
file = "docs/release-notes.md"
notable_file = "docs/notable-release-notes.md"
labels = [
  {{ label = "noteworthy", title = "Noteworthy" }},
  {{ label = "bug", title = "Bugfixes" }},
]

# Publications compared with the previous release by `cargo herald compare`
# [[publications]]
# metadata = "target/package/{{name}}-{{version}}/Cargo.toml"
# archive = "target/package/{{name}}-{{version}}.crate"
# previous_archive_url = "https://static.crates.io/crates/{{name}}/{{name}}-{{version}}.crate"
"#
  )
}
