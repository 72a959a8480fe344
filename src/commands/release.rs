//! Release-needed command
//!
//! Gathers the signals (CI environment, git, publication comparison) and
//! prints the decision report.

use crate::commands::compare::compare_publications;
use crate::compare::all_equal;
use crate::core::ci::CiEnvironment;
use crate::core::context::HeraldContext;
use crate::core::error::HeraldResult;
use crate::release::{ReleaseSignals, decide, is_releasable_branch};
use tracing::debug;

pub fn run_release_needed(ctx: &HeraldContext, explosive: bool) -> HeraldResult<()> {
  let ci = CiEnvironment::from_env();
  let git = ctx.git()?;

  let commit_message = match &ci.commit_message {
    Some(message) => message.clone(),
    None => git.head_message()?,
  };
  let branch = match &ci.branch {
    Some(branch) => branch.clone(),
    None => git.current_branch()?,
  };
  let pattern = &ctx.config.git.releasable_branch_regex;

  let outcomes = compare_publications(ctx, None)?;
  let outcomes: Vec<_> = outcomes.into_iter().map(|(_, outcome)| outcome).collect();

  let signals = ReleaseSignals {
    skip_by_env_flag: ci.skip_release,
    skip_by_commit_message: CiEnvironment::skipped_by_commit_message(Some(&commit_message)),
    is_pull_request: ci.pull_request,
    is_releasable_branch: is_releasable_branch(&branch, pattern)?,
    publications_equal: all_equal(&outcomes),
  };
  debug!("{:?}", signals);

  let report = decide(signals, Some(&branch), pattern, explosive)?;
  println!("{}", report);
  Ok(())
}
