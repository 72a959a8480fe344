//! Integration tests for `cargo herald notes` commands

use crate::helpers::{TestWorkspace, herald_command, mount_json, run_cargo_herald, stderr_of, stdout_of};
use anyhow::Result;
use wiremock::MockServer;

const ISSUES: &str = r#"[
  {
    "number": 12,
    "title": "Fix crash on empty input",
    "html_url": "https://github.com/acme/demo/issues/12",
    "labels": [{ "name": "bug" }],
    "user": { "login": "tester" },
    "pull_request": { "url": "https://api.github.com/repos/acme/demo/pulls/12" },
    "closed_at": "2099-01-01T00:00:00Z"
  },
  {
    "number": 13,
    "title": "Document the config file",
    "html_url": "https://github.com/acme/demo/issues/13",
    "labels": [],
    "closed_at": "2099-01-02T00:00:00Z"
  },
  {
    "number": 7,
    "title": "Ancient history",
    "html_url": "https://github.com/acme/demo/issues/7",
    "labels": [{ "name": "bug" }],
    "closed_at": "2000-01-01T00:00:00Z"
  }
]"#;

const RELEASES: &str = r#"{
  "format": 1,
  "releases": [
    {
      "version": "2.0.0",
      "version_tag": "v2.0.0",
      "previous_version_tag": "v1.0.0",
      "release_date": "2024-03-01T10:00:00Z",
      "contributions": [
        {
          "author": "Alice Doe",
          "commits": [{ "id": "a1", "message": "Add streaming", "author": "Alice Doe" }]
        }
      ],
      "improvements": [
        {
          "id": 42,
          "title": "Streaming API",
          "url": "https://github.com/acme/demo/pull/42",
          "labels": ["noteworthy"]
        }
      ]
    },
    {
      "version": "1.0.1",
      "version_tag": "v1.0.1",
      "previous_version_tag": "v1.0.0",
      "contributions": [],
      "improvements": []
    }
  ]
}"#;

fn notes_config(api_url: &str) -> String {
  format!(
    r#"
[github]
repository = "acme/demo"
api_url = "{}"

[git]
commit_message_postfix = "[ci skip]"

[project]
version = "1.1.0"

[release_notes]
file = "docs/release-notes.md"
notable_file = "docs/notable.md"
labels = [{{ label = "bug", title = "Bugfixes" }}]

[team]
developers = ["tester:Test User"]
"#,
    api_url
  )
}

#[tokio::test(flavor = "multi_thread")]
async fn test_notes_fetch_and_preview() -> Result<()> {
  let github = MockServer::start().await;
  mount_json(&github, "/repos/acme/demo/issues", ISSUES).await;
  let ws = TestWorkspace::new()?;
  ws.write_config(&notes_config(&github.uri()))?;
  ws.commit("Add herald config")?;
  ws.tag("v1.0.0")?;

  ws.write_file("src/parser.rs", "pub fn parse() {}\n")?;
  ws.commit("Fix parser")?;
  ws.commit("Update release notes for 1.0.0 [ci skip]")?;

  let output = run_cargo_herald(&ws.path, &["herald", "notes", "fetch"])?;
  assert!(stdout_of(&output).contains("1 version(s)"));
  assert!(ws.file_exists("target/herald/release-notes.json"));

  let output = run_cargo_herald(&ws.path, &["herald", "notes", "preview"])?;
  let stdout = stdout_of(&output);
  assert!(
    stdout.contains(
      "**1.1.0** - [1 commit](https://github.com/acme/demo/compare/v1.0.0...v1.1.0) by [Test User](http://github.com/tester)"
    ),
    "unexpected preview:\n{}",
    stdout
  );
  assert!(stdout.contains(" - [Bugfixes] Fix crash on empty input [(#12)](https://github.com/acme/demo/issues/12)"));
  assert!(stdout.contains(" - Document the config file [(#13)](https://github.com/acme/demo/issues/13)"));
  assert!(!stdout.contains("Ancient history"), "issues closed before the previous release are excluded");

  // Labelled sections come before unlabelled improvements
  let bug = stdout.find("(#12)").expect("bugfix line");
  let docs = stdout.find("(#13)").expect("unlabelled line");
  assert!(bug < docs);

  Ok(())
}

#[test]
fn test_notes_update_prepends() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.write_config(&notes_config("http://127.0.0.1:9"))?;
  ws.write_file("docs/release-notes.md", "**1.0.0** - first release\n")?;
  ws.write_file("target/herald/release-notes.json", RELEASES)?;

  run_cargo_herald(&ws.path, &["herald", "notes", "update"])?;

  let notes = ws.read_file("docs/release-notes.md")?;
  assert!(notes.starts_with("**2.0.0 (2024-03-01)** - [1 commit](https://github.com/acme/demo/compare/v1.0.0...v2.0.0) by Alice Doe\n"));
  assert!(notes.contains(" - Streaming API [(#42)](https://github.com/acme/demo/pull/42)\n"));
  assert!(notes.contains("\n**1.0.1** - no code changes (no commits)\n - No pull requests referenced in commit messages.\n"));
  assert!(notes.ends_with("\n**1.0.0** - first release\n"));

  Ok(())
}

const CONTRIBUTORS: &str = r#"[{ "login": "alice", "html_url": "https://github.com/alice", "contributions": 5 }]"#;

async fn contributors_api() -> MockServer {
  let github = MockServer::start().await;
  mount_json(&github, "/repos/acme/demo/contributors", CONTRIBUTORS).await;
  mount_json(&github, "/users/alice", r#"{ "name": "Alice Doe" }"#).await;
  github
}

fn contributors_config(api_url: &str) -> String {
  format!(
    r#"
[github]
repository = "acme/demo"
api_url = "{}"

[project]
version = "2.0.0"
"#,
    api_url
  )
}

#[tokio::test(flavor = "multi_thread")]
async fn test_notes_contributors_feed_author_links() -> Result<()> {
  let github = contributors_api().await;
  let ws = TestWorkspace::new()?;
  ws.write_config(&contributors_config(&github.uri()))?;
  ws.write_file("target/herald/release-notes.json", RELEASES)?;

  let output = run_cargo_herald(&ws.path, &["herald", "notes", "contributors"])?;
  assert!(stdout_of(&output).contains("1 contributors written"));
  assert!(ws.read_file("target/herald/contributors.json")?.contains("Alice Doe"));

  let output = run_cargo_herald(&ws.path, &["herald", "notes", "preview"])?;
  assert!(stdout_of(&output).contains("by [Alice Doe](https://github.com/alice)"));

  Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_notes_contributors_warn_about_unknown_authors() -> Result<()> {
  let github = contributors_api().await;
  let ws = TestWorkspace::new()?;
  ws.write_config(&contributors_config(&github.uri()))?;
  ws.commit("Add herald config")?;
  ws.tag("v1.0.0")?;
  ws.commit("Streaming support")?;
  ws.commit("Streaming docs")?;

  let output = run_cargo_herald(&ws.path, &["herald", "notes", "contributors"])?;
  let stderr = stderr_of(&output);
  assert!(stderr.contains("Test User (2 commit(s) since v1.0.0)"), "unexpected log:\n{}", stderr);
  assert!(stderr.contains("has no GitHub contributor profile"));
  assert!(!stderr.contains("Alice Doe ("));

  Ok(())
}

#[test]
fn test_notes_contributors_skipped_when_configured() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.write_config(
    r#"
[github]
repository = "acme/demo"
api_url = "http://127.0.0.1:9"

[team]
contributors = ["alice:Alice Doe"]
"#,
  )?;

  let output = run_cargo_herald(&ws.path, &["herald", "notes", "contributors"])?;
  assert!(stdout_of(&output).contains("skipping"));
  assert!(!ws.file_exists("target/herald/contributors.json"));

  Ok(())
}

#[test]
fn test_notes_notable() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.write_config(&notes_config("http://127.0.0.1:9"))?;
  ws.write_file("target/herald/notable-release-notes.json", RELEASES)?;

  run_cargo_herald(&ws.path, &["herald", "notes", "notable"])?;

  let notable = ws.read_file("docs/notable.md")?;
  assert!(notable.starts_with("Notable release notes:\n\n### 2.0.0 (2024-03-01)\n\n"));
  assert!(notable.contains("[1 commit](https://github.com/acme/demo/compare/v1.0.0...v2.0.0) by 1 author\n"));
  assert!(notable.contains(" - Streaming API [(#42)](https://github.com/acme/demo/pull/42)\n"));
  assert!(notable.ends_with("Detailed release notes: https://github.com/acme/demo/blob/master/docs/release-notes.md\n"));

  Ok(())
}

#[test]
fn test_unknown_data_format_is_rejected() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.write_config(&notes_config("http://127.0.0.1:9"))?;
  ws.write_file("target/herald/release-notes.json", r#"{ "format": 99, "releases": [] }"#)?;

  let output = herald_command(&ws.path, &["herald", "notes", "preview"]).output()?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr_of(&output).contains("Unsupported data format 99"));

  Ok(())
}

#[test]
fn test_missing_config_is_reported() -> Result<()> {
  let ws = TestWorkspace::new()?;

  let output = herald_command(&ws.path, &["herald", "notes", "preview"]).output()?;
  assert!(!output.status.success());
  assert!(stderr_of(&output).contains("herald.toml"));

  Ok(())
}
