//! Process runner that never lets a secret reach logs or error text
//!
//! Every command line is masked before it is logged. Output is captured with
//! stderr merged into stdout and masked before it is returned or reported.

use crate::core::error::{HeraldError, HeraldResult};
use crate::core::secrets::SecretMasker;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::info;

/// Captured result of a finished process
#[derive(Debug, Clone)]
pub struct ProcessOutput {
  pub success: bool,
  pub exit_code: Option<i32>,
  /// Masked stdout followed by masked stderr
  pub output: String,
}

pub struct ProcessRunner {
  work_dir: PathBuf,
  masker: SecretMasker,
  dry_run: bool,
}

impl ProcessRunner {
  pub fn new(work_dir: &Path) -> Self {
    Self {
      work_dir: work_dir.to_path_buf(),
      masker: SecretMasker::new(),
      dry_run: false,
    }
  }

  pub fn with_masker(mut self, masker: SecretMasker) -> Self {
    self.masker = masker;
    self
  }

  /// Some commands cannot run even with their own `--dry-run` flag (e.g. a
  /// push without a write token). In dry-run mode they are only printed.
  pub fn with_dry_run(mut self, dry_run: bool) -> Self {
    self.dry_run = dry_run;
    self
  }

  pub fn masker(&self) -> &SecretMasker {
    &self.masker
  }

  /// Run a command and return its masked output, failing on non-zero exit
  #[allow(dead_code)] // Push needs the raw result, other callers are tests
  pub fn run(&self, args: &[String]) -> HeraldResult<String> {
    let output = self.run_unchecked(args)?;
    if !output.success {
      return Err(HeraldError::message(format!(
        "Execution of command failed (exit code {}):\n  {}\nCaptured command output:\n{}",
        output
          .exit_code
          .map(|c| c.to_string())
          .unwrap_or_else(|| "signal".to_string()),
        self.masked_command_line(args),
        output.output
      )));
    }
    Ok(output.output)
  }

  /// Run a command and hand back the result regardless of exit status
  pub fn run_unchecked(&self, args: &[String]) -> HeraldResult<ProcessOutput> {
    let masked = self.masked_command_line(args);
    let (program, rest) = args
      .split_first()
      .ok_or_else(|| HeraldError::message("Cannot execute an empty command line"))?;

    if self.dry_run {
      info!("Skipped executing: {}", masked);
      return Ok(ProcessOutput {
        success: true,
        exit_code: Some(0),
        output: String::new(),
      });
    }

    info!("Executing: {}", masked);

    let output = Command::new(program)
      .args(rest)
      .current_dir(&self.work_dir)
      .output()
      .map_err(|e| HeraldError::message(format!("Problems executing command:\n  {}\n{}", masked, e)))?;

    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));

    Ok(ProcessOutput {
      success: output.status.success(),
      exit_code: output.status.code(),
      output: self.masker.mask(&text),
    })
  }

  fn masked_command_line(&self, args: &[String]) -> String {
    self.masker.mask(&args.join(" "))
  }
}
