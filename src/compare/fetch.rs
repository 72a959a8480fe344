//! Retrieval of previously published artifacts

use crate::core::error::{HeraldError, HeraldResult};
use crate::core::secrets::SecretMasker;
use reqwest::blocking::Client;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// Downloads one artifact into a directory and returns the local path
pub trait ArtifactFetcher {
  fn fetch(&self, remote_url: &str, destination_dir: &Path) -> HeraldResult<PathBuf>;
}

/// http(s) through reqwest; `file://` URLs and plain paths are copied
pub struct HttpFetcher {
  client: Client,
  masker: SecretMasker,
}

impl HttpFetcher {
  pub fn new(masker: SecretMasker) -> HeraldResult<Self> {
    let client = Client::builder()
      .user_agent(concat!("cargo-herald/", env!("CARGO_PKG_VERSION")))
      .timeout(Duration::from_secs(60))
      .build()
      .map_err(|e| HeraldError::message(format!("Failed to build HTTP client: {}", e)))?;
    Ok(Self { client, masker })
  }

  fn error(&self, url: &str, reason: impl std::fmt::Display) -> HeraldError {
    HeraldError::Fetch {
      url: self.masker.mask(url),
      reason: self.masker.mask(&reason.to_string()),
    }
  }

  fn download(&self, url: &str) -> HeraldResult<Vec<u8>> {
    let response = self.client.get(url).send().map_err(|e| self.error(url, e))?;
    let status = response.status();
    if !status.is_success() {
      return Err(self.error(url, format!("HTTP {}", status)));
    }
    let bytes = response.bytes().map_err(|e| self.error(url, e))?;
    Ok(bytes.to_vec())
  }
}

/// Last path segment of a URL or path, without query or fragment
pub fn file_name_of(remote_url: &str) -> String {
  let path = remote_url.split(['?', '#']).next().unwrap_or(remote_url);
  path
    .trim_end_matches('/')
    .rsplit('/')
    .next()
    .filter(|s| !s.is_empty())
    .unwrap_or("artifact")
    .to_string()
}

impl ArtifactFetcher for HttpFetcher {
  fn fetch(&self, remote_url: &str, destination_dir: &Path) -> HeraldResult<PathBuf> {
    fs::create_dir_all(destination_dir)?;
    let destination = destination_dir.join(file_name_of(remote_url));
    info!("Fetching {}", self.masker.mask(remote_url));

    if remote_url.starts_with("http://") || remote_url.starts_with("https://") {
      let bytes = self.download(remote_url)?;
      fs::write(&destination, bytes).map_err(|e| self.error(remote_url, e))?;
    } else {
      let source = remote_url.strip_prefix("file://").unwrap_or(remote_url);
      fs::copy(source, &destination).map_err(|e| self.error(remote_url, e))?;
    }
    Ok(destination)
  }
}
