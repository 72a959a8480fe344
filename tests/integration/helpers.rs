//! Test helpers for integration tests

use anyhow::{Context, Result};
use flate2::Compression;
use flate2::write::GzEncoder;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;
use wiremock::{Mock, MockServer, ResponseTemplate, matchers};

/// Variables the binary reacts to; cleared so the host CI cannot leak in
const HOST_VARS: &[&str] = &[
  "SKIP_RELEASE",
  "TRAVIS_PULL_REQUEST",
  "TRAVIS_BRANCH",
  "TRAVIS_COMMIT_MESSAGE",
  "TRAVIS_BUILD_NUMBER",
  "GITHUB_EVENT_NAME",
  "GITHUB_HEAD_REF",
  "GITHUB_REF_NAME",
  "HERALD_LOG",
  "HTTP_PROXY",
  "HTTPS_PROXY",
  "ALL_PROXY",
  "http_proxy",
  "https_proxy",
  "all_proxy",
];

/// A test repository with git history and a root package
pub struct TestWorkspace {
  _root: TempDir,
  pub path: PathBuf,
}

impl TestWorkspace {
  /// Create a new test repository with a single `demo` package
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();

    git(&path, &["init", "--initial-branch=main"])?;
    git(&path, &["config", "user.name", "Test User"])?;
    git(&path, &["config", "user.email", "test@example.com"])?;

    std::fs::write(
      path.join("Cargo.toml"),
      r#"[package]
name = "demo"
version = "1.1.0"
edition = "2021"
license = "MIT"
"#,
    )?;
    std::fs::create_dir_all(path.join("src"))?;
    std::fs::write(path.join("src/lib.rs"), "pub fn hello() -> &'static str {\n    \"hello\"\n}\n")?;
    std::fs::write(path.join(".gitignore"), "target/\n")?;

    git(&path, &["add", "."])?;
    git(&path, &["commit", "-m", "Initial commit"])?;

    Ok(Self { _root: root, path })
  }

  /// Write herald.toml
  pub fn write_config(&self, content: &str) -> Result<()> {
    self.write_file("herald.toml", content)
  }

  /// Write a file relative to the repository root, creating parent directories
  pub fn write_file(&self, path: &str, content: &str) -> Result<()> {
    let file_path = self.path.join(path);
    if let Some(parent) = file_path.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(file_path, content)?;
    Ok(())
  }

  /// Commit current changes
  pub fn commit(&self, message: &str) -> Result<String> {
    git(&self.path, &["add", "."])?;
    git(&self.path, &["commit", "--allow-empty", "-m", message])?;
    self.head()
  }

  /// Lightweight tag on HEAD
  pub fn tag(&self, name: &str) -> Result<()> {
    git(&self.path, &["tag", name])?;
    Ok(())
  }

  pub fn head(&self) -> Result<String> {
    let output = git(&self.path, &["rev-parse", "HEAD"])?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Get git log
  pub fn git_log(&self, n: usize) -> Result<Vec<String>> {
    let output = git(&self.path, &["log", &format!("-{}", n), "--format=%s"])?;
    Ok(
      String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(String::from)
        .collect(),
    )
  }

  /// Check if a file exists
  pub fn file_exists(&self, path: &str) -> bool {
    self.path.join(path).exists()
  }

  /// Read a file
  pub fn read_file(&self, path: &str) -> Result<String> {
    Ok(std::fs::read_to_string(self.path.join(path))?)
  }
}

/// Run git command in a directory
pub fn git(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = Command::new("git")
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run git command")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::bail!("Git command failed: git {}\n{}", args.join(" "), stderr);
  }

  Ok(output)
}

/// cargo-herald command with host CI and proxy variables cleared
pub fn herald_command(cwd: &Path, args: &[&str]) -> Command {
  let mut cmd = Command::new(env!("CARGO_BIN_EXE_cargo-herald"));
  cmd.current_dir(cwd).args(args);
  for var in HOST_VARS {
    cmd.env_remove(var);
  }
  cmd
}

/// Run cargo-herald and fail on a non-zero exit
pub fn run_cargo_herald(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = herald_command(cwd, args)
    .output()
    .context("Failed to run cargo-herald")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    anyhow::bail!(
      "cargo-herald command failed: cargo {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      stdout,
      stderr
    );
  }

  Ok(output)
}

pub fn stdout_of(output: &Output) -> String {
  String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr_of(output: &Output) -> String {
  String::from_utf8_lossy(&output.stderr).to_string()
}

/// Write a `.crate`-style archive with entries under `{name}-{version}/`
pub fn write_crate_archive(path: &Path, name: &str, version: &str, files: &[(&str, &str)]) -> Result<()> {
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent)?;
  }
  let file = std::fs::File::create(path)?;
  let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
  for (entry, content) in files {
    let mut header = tar::Header::new_gnu();
    header.set_size(content.len() as u64);
    header.set_entry_type(tar::EntryType::Regular);
    header.set_mode(0o644);
    header.set_cksum();
    builder.append_data(&mut header, format!("{}-{}/{}", name, version, entry), content.as_bytes())?;
  }
  builder.into_inner()?.finish()?;
  Ok(())
}

/// Serve `body` as JSON for every GET of `route`, query strings ignored
pub async fn mount_json(server: &MockServer, route: &str, body: &str) {
  Mock::given(matchers::method("GET"))
    .and(matchers::path(route))
    .respond_with(ResponseTemplate::new(200).set_body_raw(body.to_string(), "application/json"))
    .mount(server)
    .await;
}
