//! Run context: workspace root, loaded config and the environment-derived
//! values commands share. Built once in main.rs, passed by reference.

use crate::cargo::metadata::WorkspaceMetadata;
use crate::core::config::HeraldConfig;
use crate::core::error::HeraldResult;
use crate::core::secrets::SecretMasker;
use crate::core::vcs::SystemGit;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct HeraldContext {
  /// Workspace root directory
  pub root: PathBuf,

  pub config: HeraldConfig,
}

impl HeraldContext {
  pub fn build(workspace_root: &Path) -> HeraldResult<Self> {
    let config = HeraldConfig::load(workspace_root)?;
    Ok(Self {
      root: workspace_root.to_path_buf(),
      config,
    })
  }

  pub fn git(&self) -> HeraldResult<SystemGit> {
    SystemGit::open(&self.root)
  }

  /// A file under the configured data directory
  pub fn data_file(&self, name: &str) -> PathBuf {
    self.config.data_dir(&self.root).join(name)
  }

  /// Resolve a configured path against the workspace root
  pub fn resolve(&self, path: &Path) -> PathBuf {
    self.root.join(path)
  }

  /// Version being released: configured, else the root package version
  pub fn version(&self) -> HeraldResult<String> {
    match &self.config.project.version {
      Some(version) => Ok(version.clone()),
      None => WorkspaceMetadata::load(&self.root)?.root_version(),
    }
  }

  /// Artifact name of a publication: configured, else the root package name
  pub fn artifact_name(&self, configured: Option<&str>) -> HeraldResult<String> {
    match configured {
      Some(name) => Ok(name.to_string()),
      None => WorkspaceMetadata::load(&self.root)?.root_name(),
    }
  }

  /// Last released version: configured, else the newest older tag
  pub fn previous_version(&self, git: &SystemGit, version: &str) -> HeraldResult<Option<String>> {
    if let Some(previous) = &self.config.project.previous_version {
      return Ok(Some(previous.clone()));
    }
    let previous = git.previous_version_before(&self.config.git.tag_prefix, version)?;
    debug!("Previous version of {}: {:?}", version, previous);
    Ok(previous)
  }

  pub fn read_token(&self) -> Option<String> {
    token_from(self.config.github.read_token_env.as_deref())
  }

  pub fn write_token(&self) -> Option<String> {
    token_from(self.config.github.write_token_env.as_deref())
  }

  /// Masker knowing every token available to this run
  pub fn masker(&self) -> SecretMasker {
    SecretMasker::new()
      .with_secret(self.read_token().as_deref())
      .with_secret(self.write_token().as_deref())
  }
}

fn token_from(env_name: Option<&str>) -> Option<String> {
  env_name
    .and_then(|name| std::env::var(name).ok())
    .filter(|token| !token.trim().is_empty())
}
