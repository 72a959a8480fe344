//! Masking of secret values in command lines, URLs, output and errors

/// Replacement text for any masked secret
pub const MASK: &str = "[SECRET]";

/// Holds every secret value known to the current run
#[derive(Debug, Clone, Default)]
pub struct SecretMasker {
  secrets: Vec<String>,
}

impl SecretMasker {
  pub fn new() -> Self {
    Self::default()
  }

  /// Register a secret. Empty values are ignored, they would mask everything.
  pub fn add(&mut self, secret: impl Into<String>) {
    let secret = secret.into();
    if secret.is_empty() || self.secrets.contains(&secret) {
      return;
    }
    self.secrets.push(secret);
    // Longest first so a secret containing another is masked whole.
    self.secrets.sort_by_key(|s| std::cmp::Reverse(s.len()));
  }

  /// Builder-style variant of [`SecretMasker::add`]
  pub fn with_secret(mut self, secret: Option<&str>) -> Self {
    if let Some(secret) = secret {
      self.add(secret);
    }
    self
  }

  pub fn mask(&self, text: &str) -> String {
    let mut masked = text.to_string();
    for secret in &self.secrets {
      masked = masked.replace(secret.as_str(), MASK);
    }
    masked
  }
}
