//! Git publishing commands: commit the notes files, push the release

use crate::core::ci::CiEnvironment;
use crate::core::context::HeraldContext;
use crate::core::error::{HeraldError, HeraldResult};
use crate::core::exec::ProcessRunner;
use std::path::PathBuf;
use tracing::info;

/// Remote URL with the write token embedded, or the configured remote name
pub fn push_target(remote: &str, repository: Option<&str>, user: Option<&str>, token: Option<&str>) -> String {
  match (repository, token) {
    (Some(repository), Some(token)) => format!(
      "https://{}:{}@github.com/{}.git",
      user.unwrap_or("x-access-token"),
      token,
      repository
    ),
    _ => remote.to_string(),
  }
}

/// Commit message with the configured postfix, decorated with the CI job link
pub fn commit_message(base: &str, ci: &CiEnvironment, repository: &str, postfix: &str) -> String {
  let postfix = ci.decorate_commit_message_postfix(repository, postfix);
  format!("{} {}", base, postfix).trim_end().to_string()
}

/// Commit the release notes files
pub fn run_commit(ctx: &HeraldContext) -> HeraldResult<()> {
  let notes_config = &ctx.config.release_notes;
  let files: Vec<PathBuf> = [notes_config.file.as_ref(), notes_config.notable_file.as_ref()]
    .into_iter()
    .flatten()
    .filter(|f| ctx.resolve(f).exists())
    .cloned()
    .collect();
  if files.is_empty() {
    return Err(HeraldError::with_help(
      "No release notes files to commit",
      "Run `cargo herald notes update` first and check `release_notes.file` in herald.toml",
    ));
  }

  let version = ctx.version()?;
  let message = commit_message(
    &format!("Update release notes for {}", version),
    &CiEnvironment::from_env(),
    ctx.config.github.repository.as_deref().unwrap_or_default(),
    &ctx.config.git.commit_message_postfix,
  );

  let git = ctx.git()?;
  let paths: Vec<&std::path::Path> = files.iter().map(PathBuf::as_path).collect();
  let sha = git.commit_files(&paths, &message)?;
  println!("✅ Committed release notes: {}", sha);
  Ok(())
}

/// Push the release branch, and optionally the version tag
pub fn run_push(ctx: &HeraldContext, tag: bool) -> HeraldResult<()> {
  let git = ctx.git()?;
  let git_config = &ctx.config.git;
  let token = ctx.write_token();

  let mut refs = vec![git_config.branch.clone()];
  if tag {
    let version_tag = git_config.tag_for(&ctx.version()?);
    if !git.tag_exists(&version_tag) {
      git.create_tag(&version_tag)?;
      info!("Created tag {}", version_tag);
    }
    refs.push(version_tag);
  }

  let target = push_target(
    &git_config.remote,
    ctx.config.github.repository.as_deref(),
    ctx.config.github.write_user.as_deref(),
    token.as_deref(),
  );
  // Without a token a real push cannot succeed, even with --dry-run
  let runner = ProcessRunner::new(&ctx.root)
    .with_masker(ctx.masker())
    .with_dry_run(git_config.dry_run && token.is_none());

  let output = git.push(&runner, &target, &refs, git_config.dry_run, token.is_some())?;
  if !output.trim().is_empty() {
    println!("{}", output.trim_end());
  }
  let mode = if git_config.dry_run { " (dry-run)" } else { "" };
  println!("✅ Pushed {}{}", refs.join(" "), mode);
  Ok(())
}
