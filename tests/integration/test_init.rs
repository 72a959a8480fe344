//! Integration tests for `cargo herald init`

use crate::helpers::{TestWorkspace, git, run_cargo_herald, stdout_of};
use anyhow::Result;

#[test]
fn test_init_creates_config_from_origin() -> Result<()> {
  let ws = TestWorkspace::new()?;
  git(&ws.path, &["remote", "add", "origin", "git@github.com:acme/demo.git"])?;

  let output = run_cargo_herald(&ws.path, &["herald", "init"])?;
  assert!(stdout_of(&output).contains("Created"));

  let config = ws.read_file("herald.toml")?;
  assert!(config.contains("repository = \"acme/demo\""));
  assert!(config.contains("branch = \"main\""));

  // The starter config is usable as is
  ws.commit("Add herald config")?;
  let output = run_cargo_herald(&ws.path, &["herald", "release-needed"])?;
  assert!(stdout_of(&output).contains("releasable branch: true (branch: main, pattern: main|release/.+)"));

  Ok(())
}

#[test]
fn test_init_without_github_origin() -> Result<()> {
  let ws = TestWorkspace::new()?;

  run_cargo_herald(&ws.path, &["herald", "init"])?;

  let config = ws.read_file("herald.toml")?;
  assert!(config.contains("# repository = \"owner/repo\""));

  Ok(())
}

#[test]
fn test_init_keeps_existing_config() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.write_file(".config/herald.toml", "[git]\nbranch = \"trunk\"\n")?;

  let output = run_cargo_herald(&ws.path, &["herald", "init"])?;
  assert!(stdout_of(&output).contains("Configuration already exists"));
  assert!(!ws.file_exists("herald.toml"));
  assert_eq!(ws.read_file(".config/herald.toml")?, "[git]\nbranch = \"trunk\"\n");

  // A second run after creating herald.toml leaves it untouched
  ws.write_config("[git]\nbranch = \"main\"\n")?;
  run_cargo_herald(&ws.path, &["herald", "init"])?;
  assert_eq!(ws.read_file("herald.toml")?, "[git]\nbranch = \"main\"\n");

  Ok(())
}
