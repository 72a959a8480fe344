//! Commit exclusion predicates

use crate::notes::model::Commit;

/// Decides whether a commit is hidden from release notes
pub trait CommitFilter {
  fn is_excluded(&self, commit: &Commit) -> bool;
}

/// Excludes commits whose message ends with a fixed postfix, e.g. `[ci skip]`
/// on commits made by the release automation itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessagePostfix {
  postfix: String,
}

impl MessagePostfix {
  pub fn new(postfix: impl Into<String>) -> Self {
    Self { postfix: postfix.into() }
  }
}

impl CommitFilter for MessagePostfix {
  fn is_excluded(&self, commit: &Commit) -> bool {
    commit.message.ends_with(&self.postfix)
  }
}

/// Never excludes anything
#[derive(Debug, Clone, Copy, Default)]
pub struct KeepAll;

impl CommitFilter for KeepAll {
  fn is_excluded(&self, _commit: &Commit) -> bool {
    false
  }
}
