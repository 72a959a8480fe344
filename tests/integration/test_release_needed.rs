//! Integration tests for `cargo herald release-needed`

use crate::helpers::{TestWorkspace, herald_command, run_cargo_herald, stderr_of, stdout_of, write_crate_archive};
use anyhow::Result;

const CONFIG: &str = r#"
[git]
releasable_branch_regex = "main|release/.+"
"#;

fn workspace() -> Result<TestWorkspace> {
  let ws = TestWorkspace::new()?;
  ws.write_config(CONFIG)?;
  ws.commit("Add herald config")?;
  Ok(ws)
}

#[test]
fn test_release_needed_on_releasable_branch() -> Result<()> {
  let ws = workspace()?;

  let output = run_cargo_herald(&ws.path, &["herald", "release-needed"])?;
  let stdout = stdout_of(&output);
  assert!(stdout.contains("Release needed: true"), "unexpected report:\n{}", stdout);
  assert!(stdout.contains("releasable branch: true (branch: main, pattern: main|release/.+)"));

  Ok(())
}

#[test]
fn test_skip_release_env_variable() -> Result<()> {
  let ws = workspace()?;

  let output = herald_command(&ws.path, &["herald", "release-needed"])
    .env("SKIP_RELEASE", "true")
    .output()?;
  assert!(output.status.success());
  let stdout = stdout_of(&output);
  assert!(stdout.contains("Release needed: false"));
  assert!(stdout.contains("skip by env variable: true"));

  Ok(())
}

#[test]
fn test_explosive_mode_exit_code() -> Result<()> {
  let ws = workspace()?;

  let output = herald_command(&ws.path, &["herald", "release-needed", "--explosive"])
    .env("SKIP_RELEASE", "")
    .output()?;
  assert_eq!(output.status.code(), Some(3));
  assert!(stderr_of(&output).contains("Release is not needed"));

  // A needed release is not an error in explosive mode
  run_cargo_herald(&ws.path, &["herald", "release-needed", "--explosive"])?;

  Ok(())
}

#[test]
fn test_skip_keyword_in_head_commit() -> Result<()> {
  let ws = workspace()?;
  ws.commit("Fix typo in docs [ci skip-release]")?;

  let output = run_cargo_herald(&ws.path, &["herald", "release-needed"])?;
  let stdout = stdout_of(&output);
  assert!(stdout.contains("Release needed: false"));
  assert!(stdout.contains("skip by commit message: true"));

  // The CI-provided message wins over the HEAD commit
  let output = herald_command(&ws.path, &["herald", "release-needed"])
    .env("TRAVIS_COMMIT_MESSAGE", "Regular change")
    .output()?;
  assert!(stdout_of(&output).contains("Release needed: true"));

  Ok(())
}

#[test]
fn test_pull_request_build() -> Result<()> {
  let ws = workspace()?;

  let output = herald_command(&ws.path, &["herald", "release-needed"])
    .env("TRAVIS_PULL_REQUEST", "17")
    .output()?;
  let stdout = stdout_of(&output);
  assert!(stdout.contains("Release needed: false"));
  assert!(stdout.contains("pull request build: true"));

  let output = herald_command(&ws.path, &["herald", "release-needed"])
    .env("TRAVIS_PULL_REQUEST", "false")
    .output()?;
  assert!(stdout_of(&output).contains("Release needed: true"));

  Ok(())
}

#[test]
fn test_branch_from_ci_environment() -> Result<()> {
  let ws = workspace()?;

  let output = herald_command(&ws.path, &["herald", "release-needed"])
    .env("TRAVIS_BRANCH", "feature/login")
    .output()?;
  let stdout = stdout_of(&output);
  assert!(stdout.contains("Release needed: false"));
  assert!(stdout.contains("releasable branch: false (branch: feature/login"));

  let output = herald_command(&ws.path, &["herald", "release-needed"])
    .env("TRAVIS_BRANCH", "release/2.x")
    .output()?;
  assert!(stdout_of(&output).contains("Release needed: true"));

  Ok(())
}

#[test]
fn test_unchanged_publications_skip_release() -> Result<()> {
  let ws = TestWorkspace::new()?;
  let published = ws.path.join("published");
  ws.write_config(&format!(
    r#"
[git]
releasable_branch_regex = "main"

[project]
version = "1.1.0"
previous_version = "1.0.0"

[[publications]]
name = "demo"
metadata = "dist/Cargo.toml"
archive = "dist/{{name}}-{{version}}.crate"
previous_metadata_url = "file://{published}/Cargo.toml"
previous_archive_url = "file://{published}/{{name}}-{{version}}.crate"
"#,
    published = published.display()
  ))?;
  ws.write_file("dist/Cargo.toml", "[package]\nname = \"demo\"\nversion = \"1.1.0\"\n")?;
  ws.write_file("published/Cargo.toml", "[package]\nname = \"demo\"\nversion = \"1.0.0\"\n")?;
  let lib = "pub fn hello() {}\n";
  write_crate_archive(&ws.path.join("dist/demo-1.1.0.crate"), "demo", "1.1.0", &[("src/lib.rs", lib)])?;
  write_crate_archive(&published.join("demo-1.0.0.crate"), "demo", "1.0.0", &[("src/lib.rs", lib)])?;
  ws.commit("Add publications")?;

  let output = run_cargo_herald(&ws.path, &["herald", "release-needed"])?;
  let stdout = stdout_of(&output);
  assert!(stdout.contains("Release needed: false"), "unexpected report:\n{}", stdout);
  assert!(stdout.contains("publications equal: true"));

  Ok(())
}
