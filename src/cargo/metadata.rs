use crate::core::error::{HeraldError, HeraldResult};
use cargo_metadata::{MetadataCommand, Package};
use std::path::Path;

/// Workspace introspection using cargo_metadata
#[derive(Clone)]
pub struct WorkspaceMetadata {
  metadata: cargo_metadata::Metadata,
}

impl WorkspaceMetadata {
  pub fn load(workspace_root: &Path) -> HeraldResult<Self> {
    let metadata = MetadataCommand::new()
      .manifest_path(workspace_root.join("Cargo.toml"))
      .no_deps()
      .exec()?;
    Ok(Self { metadata })
  }

  /// The package released by this repository
  pub fn root_package(&self) -> HeraldResult<&Package> {
    self.metadata.root_package().ok_or_else(|| {
      HeraldError::with_help(
        "No root package in this workspace",
        "Set `project.version` and `publications[].name` in herald.toml for virtual workspaces",
      )
    })
  }

  pub fn root_name(&self) -> HeraldResult<String> {
    Ok(self.root_package()?.name.to_string())
  }

  pub fn root_version(&self) -> HeraldResult<String> {
    Ok(self.root_package()?.version.to_string())
  }
}
