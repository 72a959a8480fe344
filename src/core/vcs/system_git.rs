//! System git backend
//!
//! Every call runs the `git` binary in an isolated environment:
//! - working directory pinned with `-C`
//! - environment cleared, only PATH and HOME kept
//! - safe configuration overrides

use crate::core::error::{GitError, HeraldError, HeraldResult, ResultExt};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Git backend using the system git binary
pub struct SystemGit {
  /// Repository working directory
  pub(crate) repo_path: PathBuf,
}

impl SystemGit {
  /// Open a git repository
  pub fn open(path: &Path) -> HeraldResult<Self> {
    let output = Command::new("git")
      .arg("-C")
      .arg(path)
      .args(["rev-parse", "--show-toplevel"])
      .output()
      .context("Failed to execute git rev-parse")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      if stderr.contains("not a git repository") {
        return Err(HeraldError::Git(GitError::RepoNotFound {
          path: path.to_path_buf(),
        }));
      }
      return Err(HeraldError::message(format!("Failed to open git repository: {}", stderr)));
    }

    Ok(Self {
      repo_path: path.to_path_buf(),
    })
  }

  /// Get HEAD commit SHA
  pub fn head_commit(&self) -> HeraldResult<String> {
    self.run(&["rev-parse", "HEAD"])
  }

  /// Get current branch name, "HEAD" when detached
  pub fn current_branch(&self) -> HeraldResult<String> {
    let output = self
      .git_cmd()
      .args(["rev-parse", "--abbrev-ref", "HEAD"])
      .output()
      .context("Failed to get current branch")?;

    if !output.status.success() {
      return Ok("HEAD".to_string());
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Fetch URL of a configured remote
  pub fn remote_url(&self, remote: &str) -> HeraldResult<String> {
    self.run(&["remote", "get-url", remote])
  }

  /// Full message of the HEAD commit
  pub fn head_message(&self) -> HeraldResult<String> {
    self.run(&["log", "-1", "--format=%B", "HEAD"])
  }

  /// Run a git command and return its trimmed stdout
  pub(crate) fn run(&self, args: &[&str]) -> HeraldResult<String> {
    let output = self
      .git_cmd()
      .args(args)
      .output()
      .with_context(|| format!("Failed to execute git {}", args.join(" ")))?;

    if !output.status.success() {
      return Err(HeraldError::Git(GitError::CommandFailed {
        command: format!("git {}", args.join(" ")),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
      }));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Create a safe git command with isolated environment
  pub(crate) fn git_cmd(&self) -> Command {
    let mut cmd = Command::new("git");

    cmd.arg("-C").arg(&self.repo_path);

    // Isolated environment (don't trust global config)
    cmd.env_clear();
    if let Ok(path) = std::env::var("PATH") {
      cmd.env("PATH", path);
    }
    if let Ok(home) = std::env::var("HOME") {
      cmd.env("HOME", home);
    }

    cmd.arg("-c").arg("protocol.version=2");
    cmd.arg("-c").arg("advice.detachedHead=false");
    cmd.arg("-c").arg("core.quotePath=false");
    // Signature output would corrupt parsed log formats
    cmd.arg("-c").arg("log.showSignature=false");

    cmd
  }
}
