//! Integration tests for `cargo herald compare`

use crate::helpers::{TestWorkspace, herald_command, run_cargo_herald, stderr_of, stdout_of, write_crate_archive};
use anyhow::Result;

const LIB_RS: &str = "pub fn hello() -> &'static str {\n    \"hello\"\n}\n";

fn manifest(version: &str) -> String {
  format!("[package]\nname = \"demo\"\nversion = \"{}\"\nedition = \"2021\"\n", version)
}

/// Current artifacts under dist/, previous release under published/
fn setup(ws: &TestWorkspace, current_lib: &str) -> Result<()> {
  let published = ws.path.join("published");
  ws.write_config(&format!(
    r#"
[project]
version = "1.1.0"
previous_version = "1.0.0"

[[publications]]
name = "demo"
metadata = "dist/{{name}}-{{version}}/Cargo.toml"
archive = "dist/{{name}}-{{version}}.crate"
previous_metadata_url = "file://{published}/{{name}}-{{version}}/Cargo.toml"
previous_archive_url = "file://{published}/{{name}}-{{version}}.crate"
"#,
    published = published.display()
  ))?;

  ws.write_file("dist/demo-1.1.0/Cargo.toml", &manifest("1.1.0"))?;
  write_crate_archive(
    &ws.path.join("dist/demo-1.1.0.crate"),
    "demo",
    "1.1.0",
    &[
      ("Cargo.toml", &manifest("1.1.0")),
      ("src/lib.rs", current_lib),
      (".cargo_vcs_info.json", "{\"git\":{\"sha1\":\"bbbb\"}}"),
    ],
  )?;

  ws.write_file("published/demo-1.0.0/Cargo.toml", &manifest("1.0.0"))?;
  write_crate_archive(
    &published.join("demo-1.0.0.crate"),
    "demo",
    "1.0.0",
    &[
      ("Cargo.toml", &manifest("1.0.0")),
      ("src/lib.rs", LIB_RS),
      (".cargo_vcs_info.json", "{\"git\":{\"sha1\":\"aaaa\"}}"),
    ],
  )?;
  Ok(())
}

#[test]
fn test_compare_unchanged_publication() -> Result<()> {
  let ws = TestWorkspace::new()?;
  setup(&ws, LIB_RS)?;

  let output = run_cargo_herald(&ws.path, &["herald", "compare"])?;
  let stdout = stdout_of(&output);
  assert!(
    stdout.contains("demo: metadata equal: true, archive equal: true, publications equal: true"),
    "unexpected output:\n{}",
    stdout
  );

  Ok(())
}

#[test]
fn test_compare_changed_sources() -> Result<()> {
  let ws = TestWorkspace::new()?;
  setup(&ws, "pub fn hello() -> &'static str {\n    \"hi\"\n}\n")?;

  let output = run_cargo_herald(&ws.path, &["herald", "compare"])?;
  assert!(stdout_of(&output).contains("demo: metadata equal: true, archive equal: false, publications equal: false"));

  Ok(())
}

#[test]
fn test_compare_without_previous_url() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.write_config(
    r#"
[project]
version = "1.1.0"
previous_version = "1.0.0"

[[publications]]
name = "demo"
metadata = "dist/{name}-{version}/Cargo.toml"
archive = "dist/{name}-{version}.crate"
"#,
  )?;
  ws.write_file("dist/demo-1.1.0/Cargo.toml", &manifest("1.1.0"))?;
  write_crate_archive(&ws.path.join("dist/demo-1.1.0.crate"), "demo", "1.1.0", &[("src/lib.rs", LIB_RS)])?;

  let output = herald_command(&ws.path, &["herald", "compare"]).output()?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr_of(&output).contains("publications.previous_metadata_url"));

  Ok(())
}

#[test]
fn test_compare_missing_local_artifact() -> Result<()> {
  let ws = TestWorkspace::new()?;
  setup(&ws, LIB_RS)?;
  std::fs::remove_file(ws.path.join("dist/demo-1.1.0.crate"))?;

  let output = herald_command(&ws.path, &["herald", "compare"]).output()?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr_of(&output).contains("demo-1.1.0.crate"));

  Ok(())
}

#[test]
fn test_compare_first_release_is_not_equal() -> Result<()> {
  let ws = TestWorkspace::new()?;
  setup(&ws, LIB_RS)?;
  let config = ws.read_file("herald.toml")?.replace("previous_version = \"1.0.0\"\n", "");
  ws.write_config(&config)?;

  // No tags and no configured previous version: nothing to compare against
  let output = run_cargo_herald(&ws.path, &["herald", "compare"])?;
  assert!(stdout_of(&output).contains("publications equal: false"));

  Ok(())
}

#[test]
fn test_compare_previous_version_from_tag() -> Result<()> {
  let ws = TestWorkspace::new()?;
  setup(&ws, LIB_RS)?;
  let config = ws.read_file("herald.toml")?.replace("previous_version = \"1.0.0\"\n", "");
  ws.write_config(&config)?;
  ws.commit("Add publications")?;
  ws.tag("v0.9.0")?;
  ws.tag("v1.0.0")?;
  ws.tag("v1.2.0")?;

  let output = run_cargo_herald(&ws.path, &["herald", "compare"])?;
  assert!(stdout_of(&output).contains("publications equal: true"));

  Ok(())
}
