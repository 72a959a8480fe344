//! Version-insensitive comparison of publication metadata (Cargo.toml)

use tracing::debug;

const VERSION_PLACEHOLDER: &str = "{VERSION}";

/// Replace both versions with a placeholder, longer version first so that
/// `1.0.0-rc.1` is not half-replaced by `1.0.0`.
pub fn normalize_versions(text: &str, versions: &[&str]) -> String {
  let mut versions: Vec<&str> = versions.iter().copied().filter(|v| !v.is_empty()).collect();
  versions.sort_by_key(|v| std::cmp::Reverse(v.len()));
  versions
    .into_iter()
    .fold(text.to_string(), |acc, v| acc.replace(v, VERSION_PLACEHOLDER))
}

fn normalize_text(text: &str) -> String {
  let lines: Vec<&str> = text.lines().map(str::trim_end).collect();
  lines.join("\n").trim_end().to_string()
}

fn parse_toml(text: &str) -> Option<serde_json::Value> {
  toml_edit::de::from_str::<serde_json::Value>(text).ok()
}

/// Whether two metadata files differ only by their version strings
///
/// TOML content is compared structurally, anything else as normalized text.
pub fn metadata_equal(current: &str, current_version: &str, previous: &str, previous_version: &str) -> bool {
  let versions = [current_version, previous_version];
  let current = normalize_versions(current, &versions);
  let previous = normalize_versions(previous, &versions);

  match (parse_toml(&current), parse_toml(&previous)) {
    (Some(a), Some(b)) => {
      debug!("Comparing metadata structurally");
      a == b
    }
    _ => {
      debug!("Comparing metadata as text");
      normalize_text(&current) == normalize_text(&previous)
    }
  }
}
