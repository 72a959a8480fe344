//! GitHub REST payloads and their mapping onto the notes model

use crate::notes::model::{Contributor, Improvement};
use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct IssueLabel {
  pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserRef {
  pub login: String,
}

/// `GET /repos/{repo}/issues` item; pull requests carry a `pull_request` object
#[derive(Debug, Deserialize)]
pub(crate) struct Issue {
  pub number: u64,
  pub title: String,
  pub html_url: String,
  #[serde(default)]
  pub labels: Vec<IssueLabel>,
  #[serde(default)]
  pub user: Option<UserRef>,
  #[serde(default)]
  pub pull_request: Option<serde_json::Value>,
  #[serde(default)]
  pub closed_at: Option<DateTime<Utc>>,
}

/// `GET /repos/{repo}/contributors` item
#[derive(Debug, Deserialize)]
pub(crate) struct RepoContributor {
  pub login: String,
  pub html_url: String,
  #[serde(default)]
  pub contributions: u32,
}

/// `GET /users/{login}`
#[derive(Debug, Deserialize)]
pub(crate) struct User {
  #[serde(default)]
  pub name: Option<String>,
}

impl Issue {
  pub fn into_improvement(self) -> Improvement {
    Improvement {
      id: self.number,
      title: self.title,
      url: self.html_url,
      labels: self.labels.into_iter().map(|l| l.name).collect(),
      author: self.user.map(|u| u.login),
      is_pull_request: self.pull_request.is_some(),
      closed_at: self.closed_at,
    }
  }

  /// Closed inside `(since, until]`; open bounds accept everything
  ///
  /// Adjacent versions share a tag date as `until` and `since`, the half-open
  /// window puts an issue closed exactly at that date in the older version only.
  pub fn closed_within(&self, since: Option<DateTime<Utc>>, until: Option<DateTime<Utc>>) -> bool {
    let Some(closed) = self.closed_at else {
      return false;
    };
    since.is_none_or(|s| closed > s) && until.is_none_or(|u| closed <= u)
  }
}

impl RepoContributor {
  pub fn into_contributor(self, user: Option<User>) -> Contributor {
    let name = user.and_then(|u| u.name).unwrap_or_default();
    Contributor::new(name, self.login, self.html_url, self.contributions)
  }
}
