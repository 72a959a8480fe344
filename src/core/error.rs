//! Error types for cargo-herald with contextual messages and exit codes
//!
//! This module provides a unified error type that categorizes errors and provides
//! contextual help messages to users. Error text never carries secrets: callers
//! mask command lines and URLs before building an error.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for cargo-herald
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, invalid args, missing artifacts)
  User = 1,
  /// System error (git, network, I/O)
  System = 2,
  /// Release was not needed and the caller asked for that to be fatal
  NotNeeded = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for cargo-herald
#[derive(Debug)]
pub enum HeraldError {
  /// Configuration errors
  Config(ConfigError),

  /// Git operation errors
  Git(GitError),

  /// A remote resource (GitHub API, previous artifact) could not be fetched
  Fetch { url: String, reason: String },

  /// An input that must already exist is missing (e.g. artifact not built)
  Precondition { message: String },

  /// Release is not needed and explosive mode is on
  ReleaseNotNeeded { report: String },

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl HeraldError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    HeraldError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    HeraldError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Shorthand for a missing or invalid config field
  pub fn missing_field(field: impl Into<String>) -> Self {
    HeraldError::Config(ConfigError::MissingField { field: field.into() })
  }

  /// Shorthand for an invalid config value
  pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
    HeraldError::Config(ConfigError::Invalid {
      field: field.into(),
      reason: reason.into(),
    })
  }

  pub fn precondition(message: impl Into<String>) -> Self {
    HeraldError::Precondition {
      message: message.into(),
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      HeraldError::Message { message, context, help } => HeraldError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      HeraldError::Io(err) => HeraldError::Message {
        message: format!("I/O error: {}", err),
        context: Some(ctx_str),
        help: None,
      },
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      HeraldError::Config(_) => ExitCode::User,
      HeraldError::Precondition { .. } => ExitCode::User,
      HeraldError::Git(_) => ExitCode::System,
      HeraldError::Fetch { .. } => ExitCode::System,
      HeraldError::Io(_) => ExitCode::System,
      HeraldError::ReleaseNotNeeded { .. } => ExitCode::NotNeeded,
      HeraldError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      HeraldError::Config(e) => e.help_message(),
      HeraldError::Git(e) => e.help_message(),
      HeraldError::Precondition { .. } => {
        Some("Build the artifacts first (e.g. `cargo package`) and check the paths in herald.toml.".to_string())
      }
      HeraldError::ReleaseNotNeeded { .. } => {
        Some("Run without --explosive to treat a skipped release as a normal outcome.".to_string())
      }
      HeraldError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for HeraldError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      HeraldError::Config(e) => write!(f, "{}", e),
      HeraldError::Git(e) => write!(f, "{}", e),
      HeraldError::Fetch { url, reason } => write!(f, "Failed to fetch {}: {}", url, reason),
      HeraldError::Precondition { message } => write!(f, "{}", message),
      HeraldError::ReleaseNotNeeded { report } => write!(f, "Release is not needed.\n{}", report),
      HeraldError::Io(e) => write!(f, "I/O error: {}", e),
      HeraldError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for HeraldError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      HeraldError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for HeraldError {
  fn from(err: io::Error) -> Self {
    HeraldError::Io(err)
  }
}

impl From<String> for HeraldError {
  fn from(msg: String) -> Self {
    HeraldError::message(msg)
  }
}

impl From<&str> for HeraldError {
  fn from(msg: &str) -> Self {
    HeraldError::message(msg)
  }
}

impl From<cargo_metadata::Error> for HeraldError {
  fn from(err: cargo_metadata::Error) -> Self {
    HeraldError::message(format!("Cargo metadata error: {}", err))
  }
}

impl From<toml_edit::de::Error> for HeraldError {
  fn from(err: toml_edit::de::Error) -> Self {
    HeraldError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<serde_json::Error> for HeraldError {
  fn from(err: serde_json::Error) -> Self {
    HeraldError::message(format!("JSON error: {}", err))
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// herald.toml not found
  NotFound { workspace_root: PathBuf },

  /// Missing required field
  MissingField { field: String },

  /// Field present but unusable
  Invalid { field: String, reason: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::NotFound { .. } => Some("Create a herald.toml in the workspace root.".to_string()),
      ConfigError::MissingField { field } => Some(format!("Add `{}` to herald.toml.", field)),
      ConfigError::Invalid { .. } => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::NotFound { workspace_root } => {
        write!(
          f,
          "No cargo-herald configuration found.\nExpected file: {}/herald.toml",
          workspace_root.display()
        )
      }
      ConfigError::MissingField { field } => {
        write!(f, "Missing required field in config: {}", field)
      }
      ConfigError::Invalid { field, reason } => {
        write!(f, "Invalid value for '{}': {}", field, reason)
      }
    }
  }
}

/// Git operation errors
#[derive(Debug)]
pub enum GitError {
  /// Git command failed
  CommandFailed { command: String, stderr: String },

  /// Repository not found
  RepoNotFound { path: PathBuf },

  /// Push failed
  PushFailed {
    remote: String,
    branch: String,
    reason: String,
    token_set: bool,
  },
}

impl GitError {
  fn help_message(&self) -> Option<String> {
    match self {
      GitError::PushFailed { reason, token_set, .. } => {
        if reason.contains("Authentication failed") || reason.contains("unable to access") {
          if *token_set {
            Some("The write token env variable is set but possibly invalid. Please recheck your configuration.".to_string())
          } else {
            Some(
              "The write token env variable is not set or you don't have write access to the remote. Please recheck your configuration."
                .to_string(),
            )
          }
        } else if reason.contains("non-fast-forward") {
          Some("The remote has commits you don't have. Pull first.".to_string())
        } else {
          None
        }
      }
      GitError::RepoNotFound { path } => Some(format!(
        "Initialize the repository first or check the path: {}",
        path.display()
      )),
      _ => None,
    }
  }
}

impl fmt::Display for GitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GitError::CommandFailed { command, stderr } => {
        write!(f, "Git command failed: {}\n{}", command, stderr)
      }
      GitError::RepoNotFound { path } => {
        write!(f, "Git repository not found at: {}", path.display())
      }
      GitError::PushFailed {
        remote, branch, reason, ..
      } => {
        write!(f, "Push to {} {} failed: {}", remote, branch, reason)
      }
    }
  }
}

/// Result type alias for cargo-herald
pub type HeraldResult<T> = Result<T, HeraldError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> HeraldResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> HeraldResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<HeraldError>,
{
  fn context(self, ctx: impl Into<String>) -> HeraldResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> HeraldResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &HeraldError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
