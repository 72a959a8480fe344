use crate::core::error::{ConfigError, HeraldError, HeraldResult, ResultExt};
use crate::notes::contributors::TeamMember;
use crate::notes::filter::MessagePostfix;
use crate::notes::format::{LabelMapping, UnmappedLabels};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for cargo-herald
/// Searched in order: herald.toml, .herald.toml, .cargo/herald.toml, .config/herald.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeraldConfig {
  /// Where fetch stages persist their output for the format/decision stages
  #[serde(default = "default_data_dir")]
  pub data_dir: PathBuf,
  #[serde(default)]
  pub github: GitHubConfig,
  #[serde(default)]
  pub git: GitConfig,
  #[serde(default)]
  pub release_notes: ReleaseNotesConfig,
  #[serde(default)]
  pub team: TeamConfig,
  #[serde(default)]
  pub project: ProjectConfig,
  #[serde(default)]
  pub publications: Vec<PublicationConfig>,
}

fn default_data_dir() -> PathBuf {
  PathBuf::from("target").join("herald")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
  /// "owner/repo"
  #[serde(default)]
  pub repository: Option<String>,

  #[serde(default = "default_api_url")]
  pub api_url: String,

  /// Name of the env variable holding a read-only token
  #[serde(default)]
  pub read_token_env: Option<String>,

  /// Name of the env variable holding a token with push rights
  #[serde(default)]
  pub write_token_env: Option<String>,

  #[serde(default)]
  pub write_user: Option<String>,
}

fn default_api_url() -> String {
  "https://api.github.com".to_string()
}

impl Default for GitHubConfig {
  fn default() -> Self {
    Self {
      repository: None,
      api_url: default_api_url(),
      read_token_env: None,
      write_token_env: None,
      write_user: None,
    }
  }
}

impl GitHubConfig {
  /// Repository or a configuration error naming the missing field
  pub fn require_repository(&self) -> HeraldResult<&str> {
    match self.repository.as_deref().map(str::trim) {
      Some(repo) if !repo.is_empty() => Ok(repo),
      _ => Err(HeraldError::missing_field("github.repository")),
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitConfig {
  #[serde(default = "default_tag_prefix")]
  pub tag_prefix: String,

  /// Full-match pattern of branches allowed to release, e.g. "master|release/.+"
  #[serde(default = "default_releasable_branch_regex")]
  pub releasable_branch_regex: String,

  /// Postfix appended to automation commits, those commits are hidden from notes
  #[serde(default)]
  pub commit_message_postfix: String,

  /// Branch the release notes files live on
  #[serde(default = "default_branch")]
  pub branch: String,

  #[serde(default = "default_remote")]
  pub remote: String,

  /// Push with --dry-run unless explicitly disabled
  #[serde(default = "default_true")]
  pub dry_run: bool,
}

fn default_tag_prefix() -> String {
  "v".to_string()
}

fn default_releasable_branch_regex() -> String {
  "master|release/.+".to_string()
}

fn default_branch() -> String {
  "master".to_string()
}

fn default_remote() -> String {
  "origin".to_string()
}

fn default_true() -> bool {
  true
}

impl Default for GitConfig {
  fn default() -> Self {
    Self {
      tag_prefix: default_tag_prefix(),
      releasable_branch_regex: default_releasable_branch_regex(),
      commit_message_postfix: String::new(),
      branch: default_branch(),
      remote: default_remote(),
      dry_run: true,
    }
  }
}

impl GitConfig {
  /// Commit filter for automation commits, if a postfix is configured
  pub fn commit_filter(&self) -> Option<MessagePostfix> {
    if self.commit_message_postfix.is_empty() {
      None
    } else {
      Some(MessagePostfix::new(self.commit_message_postfix.clone()))
    }
  }

  pub fn tag_for(&self, version: &str) -> String {
    format!("{}{}", self.tag_prefix, version)
  }
}

/// One entry of the ordered label mapping
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LabelTitle {
  pub label: String,
  pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseNotesConfig {
  /// Detailed release notes file, new content is prepended
  #[serde(default)]
  pub file: Option<PathBuf>,

  #[serde(default)]
  pub notable_file: Option<PathBuf>,

  /// Where publications end up, shown in the notes
  #[serde(default)]
  pub publication_repository: Option<String>,

  /// Label groups in the order they appear in the notes
  #[serde(default)]
  pub labels: Vec<LabelTitle>,

  #[serde(default)]
  pub unmapped_labels: UnmappedLabels,

  #[serde(default = "default_noteworthy_label")]
  pub noteworthy_label: String,

  #[serde(default = "default_notable_introduction")]
  pub notable_introduction: String,
}

fn default_noteworthy_label() -> String {
  "noteworthy".to_string()
}

fn default_notable_introduction() -> String {
  "Notable release notes:\n\n".to_string()
}

impl Default for ReleaseNotesConfig {
  fn default() -> Self {
    Self {
      file: None,
      notable_file: None,
      publication_repository: None,
      labels: Vec::new(),
      unmapped_labels: UnmappedLabels::default(),
      noteworthy_label: default_noteworthy_label(),
      notable_introduction: default_notable_introduction(),
    }
  }
}

impl ReleaseNotesConfig {
  pub fn label_mapping(&self) -> LabelMapping {
    self
      .labels
      .iter()
      .map(|l| (l.label.clone(), l.title.clone()))
      .collect()
  }

  pub fn require_file(&self) -> HeraldResult<&Path> {
    self
      .file
      .as_deref()
      .ok_or_else(|| HeraldError::missing_field("release_notes.file"))
  }

  pub fn require_notable_file(&self) -> HeraldResult<&Path> {
    self
      .notable_file
      .as_deref()
      .ok_or_else(|| HeraldError::missing_field("release_notes.notable_file"))
  }
}

/// Team members in compact "login:Full Name" notation
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TeamConfig {
  #[serde(default)]
  pub developers: Vec<String>,
  /// When set, GitHub contributors are neither fetched nor read from cache
  #[serde(default)]
  pub contributors: Vec<String>,
}

impl TeamConfig {
  pub fn validate(&self) -> HeraldResult<()> {
    for (field, entries) in [("team.developers", &self.developers), ("team.contributors", &self.contributors)] {
      for entry in entries {
        TeamMember::parse(entry).with_context(|| format!("Invalid entry in {}", field))?;
      }
    }
    Ok(())
  }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProjectConfig {
  /// Version being released; defaults to the root package version
  #[serde(default)]
  pub version: Option<String>,
  /// Last released version; defaults to the newest tag older than `version`
  #[serde(default)]
  pub previous_version: Option<String>,
}

/// A publication: a metadata file and a sources archive, compared across versions
///
/// Paths and URLs are templates accepting `{group}`, `{name}` and `{version}`.
///
/// # Example
///
/// ```toml
/// [[publications]]
/// group = "crates.io"
/// metadata = "target/package/{name}-{version}/Cargo.toml"
/// archive = "target/package/{name}-{version}.crate"
/// previous_archive_url = "https://static.crates.io/crates/{name}/{name}-{version}.crate"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicationConfig {
  #[serde(default = "default_group")]
  pub group: String,
  /// Artifact name; defaults to the root package name
  #[serde(default)]
  pub name: Option<String>,
  pub metadata: String,
  pub archive: String,
  #[serde(default)]
  pub previous_metadata_url: Option<String>,
  #[serde(default)]
  pub previous_archive_url: Option<String>,
}

fn default_group() -> String {
  "crates.io".to_string()
}

/// Expand `{group}`, `{name}` and `{version}` in a path or URL template
pub fn expand_template(template: &str, group: &str, name: &str, version: &str) -> String {
  template
    .replace("{group}", group)
    .replace("{name}", name)
    .replace("{version}", version)
}

impl HeraldConfig {
  /// Find config file in search order: herald.toml, .herald.toml, .cargo/herald.toml, .config/herald.toml
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = vec![
      path.join("herald.toml"),
      path.join(".herald.toml"),
      path.join(".cargo").join("herald.toml"),
      path.join(".config").join("herald.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load config from herald.toml (searches multiple locations)
  pub fn load(path: &Path) -> HeraldResult<Self> {
    let config_path = Self::find_config_path(path).ok_or_else(|| {
      HeraldError::Config(ConfigError::NotFound {
        workspace_root: path.to_path_buf(),
      })
    })?;

    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config = Self::parse(&content).with_context(|| format!("Invalid config in {}", config_path.display()))?;

    Ok(config)
  }

  pub fn parse(content: &str) -> HeraldResult<Self> {
    let config: HeraldConfig = toml_edit::de::from_str(content)?;
    config.validate()?;
    Ok(config)
  }

  pub fn validate(&self) -> HeraldResult<()> {
    self.team.validate()?;

    regex::Regex::new(&self.git.releasable_branch_regex).map_err(|e| {
      HeraldError::invalid_config("git.releasable_branch_regex", e.to_string())
    })?;

    for (i, label) in self.release_notes.labels.iter().enumerate() {
      if label.label.trim().is_empty() {
        return Err(HeraldError::invalid_config(
          format!("release_notes.labels[{}].label", i),
          "label must not be empty",
        ));
      }
    }

    for (i, publication) in self.publications.iter().enumerate() {
      if publication.metadata.trim().is_empty() || publication.archive.trim().is_empty() {
        return Err(HeraldError::invalid_config(
          format!("publications[{}]", i),
          "both `metadata` and `archive` paths are required",
        ));
      }
    }

    Ok(())
  }

  /// Data directory resolved against the workspace root
  pub fn data_dir(&self, workspace_root: &Path) -> PathBuf {
    workspace_root.join(&self.data_dir)
  }
}
