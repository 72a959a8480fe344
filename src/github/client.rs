//! Blocking GitHub REST client

use crate::core::error::{HeraldError, HeraldResult};
use crate::core::secrets::SecretMasker;
use crate::github::api::{Issue, RepoContributor, User};
use crate::notes::contributors::ContributorSet;
use crate::notes::model::Improvement;
use crate::notes::sources::{ContributorSource, IssueSource};
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info};

const PER_PAGE: usize = 100;
const USER_AGENT: &str = concat!("cargo-herald/", env!("CARGO_PKG_VERSION"));

pub struct GitHubClient {
  client: Client,
  api_url: String,
  repository: String,
  token: Option<String>,
  masker: SecretMasker,
}

impl GitHubClient {
  pub fn new(api_url: &str, repository: &str, token: Option<String>) -> HeraldResult<Self> {
    let client = Client::builder()
      .user_agent(USER_AGENT)
      .timeout(Duration::from_secs(30))
      .build()
      .map_err(|e| HeraldError::message(format!("Failed to build HTTP client: {}", e)))?;

    let masker = SecretMasker::new().with_secret(token.as_deref());
    Ok(Self {
      client,
      api_url: api_url.trim_end_matches('/').to_string(),
      repository: repository.to_string(),
      token,
      masker,
    })
  }

  fn fetch_error(&self, url: &str, reason: impl std::fmt::Display) -> HeraldError {
    HeraldError::Fetch {
      url: self.masker.mask(url),
      reason: self.masker.mask(&reason.to_string()),
    }
  }

  fn get<T: DeserializeOwned>(&self, url: &str) -> HeraldResult<T> {
    debug!("GET {}", self.masker.mask(url));
    let mut request = self.client.get(url).header("Accept", "application/vnd.github+json");
    if let Some(token) = &self.token {
      request = request.bearer_auth(token);
    }

    let response = request.send().map_err(|e| self.fetch_error(url, e))?;
    let status = response.status();
    if !status.is_success() {
      let body = response.text().unwrap_or_default();
      return Err(self.fetch_error(url, format!("HTTP {}: {}", status, body.trim())));
    }
    response.json::<T>().map_err(|e| self.fetch_error(url, e))
  }

  /// Every page of a list endpoint; `url` must already carry a query string
  fn get_all<T: DeserializeOwned>(&self, url: &str) -> HeraldResult<Vec<T>> {
    let mut out = Vec::new();
    for page in 1.. {
      let items: Vec<T> = self.get(&format!("{}&per_page={}&page={}", url, PER_PAGE, page))?;
      let last = items.len() < PER_PAGE;
      out.extend(items);
      if last {
        break;
      }
    }
    Ok(out)
  }

  fn repo_url(&self, path: &str) -> String {
    format!("{}/repos/{}/{}", self.api_url, self.repository, path)
  }
}

impl IssueSource for GitHubClient {
  fn closed_improvements(
    &self,
    labels: &[String],
    since: Option<DateTime<Utc>>,
    until: Option<DateTime<Utc>>,
  ) -> HeraldResult<Vec<Improvement>> {
    // GitHub's `labels` query means "all of", label filtering happens downstream
    let mut url = self.repo_url("issues?state=closed&direction=desc");
    if let Some(since) = since {
      url.push_str(&format!("&since={}", since.to_rfc3339_opts(SecondsFormat::Secs, true)));
    }

    info!("Fetching closed issues of {}", self.repository);
    let issues: Vec<Issue> = self.get_all(&url)?;
    let improvements: Vec<Improvement> = issues
      .into_iter()
      .filter(|i| i.closed_within(since, until))
      .map(Issue::into_improvement)
      .collect();
    debug!(
      "{} closed improvements (label filter {:?} applied later)",
      improvements.len(),
      labels
    );
    Ok(improvements)
  }
}

impl ContributorSource for GitHubClient {
  fn all_contributors(&self) -> HeraldResult<ContributorSet> {
    info!("Fetching contributors of {}", self.repository);
    let contributors: Vec<RepoContributor> = self.get_all(&self.repo_url("contributors?anon=false"))?;

    let mut set = ContributorSet::new();
    for contributor in contributors {
      let user: User = self.get(&format!("{}/users/{}", self.api_url, contributor.login))?;
      set.add(contributor.into_contributor(Some(user)));
    }
    info!("Fetched {} contributors", set.len());
    Ok(set)
  }
}
