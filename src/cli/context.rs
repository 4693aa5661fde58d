use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::core::errors::{DriftError, Result};

static DRIFTSPEC_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Initialize the global config directory path.
/// If `custom` is provided, uses that path; otherwise defaults to `.driftspec`.
pub fn init(custom: Option<&str>) {
    let dir = custom
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(".driftspec"));
    let _ = DRIFTSPEC_DIR.set(dir);
}

/// Get the current config directory path.
pub fn driftspec_dir() -> &'static Path {
    DRIFTSPEC_DIR
        .get()
        .map(|p| p.as_path())
        .unwrap_or(Path::new(".driftspec"))
}

/// Reject environment names that could escape the project or break paths.
///
/// Allowed: ASCII letters, digits, `-`, `_` and `.`, but not `.` or `..`.
pub fn validate_env_name(name: &str) -> Result<()> {
    let allowed = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));

    if name.is_empty() || !allowed || name == "." || name == ".." || name.contains("..") {
        return Err(DriftError::InvalidEnvironmentName {
            name: name.to_string(),
        });
    }
    Ok(())
}
