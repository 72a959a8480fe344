//! CI environment detection
//!
//! The only place that knows CI variable names. Everything is read through a
//! lookup function so the rest of the crate gets plain typed values.

/// Presence of this variable skips the release
pub const SKIP_RELEASE_ENV: &str = "SKIP_RELEASE";

/// Commit message keyword that skips the release
pub const SKIP_RELEASE_KEYWORD: &str = "[ci skip-release]";

const TRAVIS_BUILD_URL: &str = "https://travis-ci.org";

/// Build signals of the current CI job
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CiEnvironment {
  pub skip_release: bool,
  pub commit_message: Option<String>,
  pub pull_request: bool,
  pub branch: Option<String>,
  pub build_number: Option<String>,
}

impl CiEnvironment {
  /// Read CI signals from the process environment
  pub fn from_env() -> Self {
    Self::from_lookup(|name| std::env::var(name).ok())
  }

  /// Read CI signals through an arbitrary lookup (Travis CI and GitHub Actions)
  pub fn from_lookup<F>(lookup: F) -> Self
  where
    F: Fn(&str) -> Option<String>,
  {
    let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    let travis_pr = lookup("TRAVIS_PULL_REQUEST")
      .map(|v| {
        let v = v.trim();
        !v.is_empty() && v != "false"
      })
      .unwrap_or(false);
    let actions_pr = lookup("GITHUB_EVENT_NAME")
      .map(|v| v == "pull_request" || v == "pull_request_target")
      .unwrap_or(false);

    let branch = non_empty("TRAVIS_BRANCH")
      .or_else(|| non_empty("GITHUB_HEAD_REF"))
      .or_else(|| non_empty("GITHUB_REF_NAME"));

    Self {
      skip_release: lookup(SKIP_RELEASE_ENV).is_some(),
      commit_message: lookup("TRAVIS_COMMIT_MESSAGE"),
      pull_request: travis_pr || actions_pr,
      branch,
      build_number: non_empty("TRAVIS_BUILD_NUMBER"),
    }
  }

  /// Whether the given commit message asks to skip the release
  pub fn skipped_by_commit_message(message: Option<&str>) -> bool {
    message.map(|m| m.contains(SKIP_RELEASE_KEYWORD)).unwrap_or(false)
  }

  /// Commit message postfix, decorated with the CI job URL when a build number is known
  pub fn decorate_commit_message_postfix(&self, repository: &str, postfix: &str) -> String {
    match &self.build_number {
      Some(number) => format!("CI job: {}/{}/builds/{} {}", TRAVIS_BUILD_URL, repository, number, postfix)
        .trim_end()
        .to_string(),
      None => postfix.to_string(),
    }
  }
}
