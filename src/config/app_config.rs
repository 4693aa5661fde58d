use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::core::errors::{DriftError, Result};

/// Project configuration read from `.driftspec/config.toml`.
///
/// The file is optional; `AppConfig::default()` is used when it is absent.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub driftspec: DriftspecSection,
    #[serde(default)]
    pub environments: BTreeMap<String, EnvEntry>,
    #[serde(default)]
    pub report: ReportSection,
}

impl AppConfig {
    /// Load the configuration from `<dir>/config.toml`.
    ///
    /// Returns the defaults when the file does not exist. After parsing,
    /// validates the format version and every environment name.
    pub fn load(config_dir: &Path) -> Result<Self> {
        let config_path = config_dir.join("config.toml");
        if !config_path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&config_path)?;
        let config: Self = toml::from_str(&content).map_err(|e| DriftError::InvalidConfig {
            detail: format!("Failed to parse config.toml: {e}"),
        })?;

        if config.driftspec.format_version > CURRENT_FORMAT_VERSION {
            return Err(DriftError::FormatVersionTooNew {
                project_version: config.driftspec.format_version,
                supported_version: CURRENT_FORMAT_VERSION,
            });
        }

        for env_name in config.environments.keys() {
            crate::cli::context::validate_env_name(env_name)?;
        }

        if config.report.max_value_length == 0 {
            return Err(DriftError::InvalidConfig {
                detail: "report.max_value_length must be greater than zero".into(),
            });
        }

        Ok(config)
    }

    /// Ignore file or directory name, relative to the config directory.
    pub fn ignore_name(&self) -> &str {
        self.driftspec.ignore.as_deref().unwrap_or(DEFAULT_IGNORE_NAME)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            driftspec: DriftspecSection {
                version: env!("CARGO_PKG_VERSION").to_string(),
                format_version: CURRENT_FORMAT_VERSION,
                ignore: None,
            },
            environments: BTreeMap::new(),
            report: ReportSection::default(),
        }
    }
}

/// Current format version supported by this build of driftspec.
pub const CURRENT_FORMAT_VERSION: u32 = 1;

pub const DEFAULT_IGNORE_NAME: &str = ".driftignore";

pub const DEFAULT_MAX_VALUE_LENGTH: usize = 200;

/// The `[driftspec]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct DriftspecSection {
    pub version: String,
    /// Format version for backward compatibility. Defaults to 1 if missing.
    #[serde(default = "default_format_version")]
    pub format_version: u32,
    pub ignore: Option<String>,
}

fn default_format_version() -> u32 {
    1
}

/// An environment entry in `[environments]`.
#[derive(Debug, Clone, Deserialize)]
pub struct EnvEntry {
    pub file: String,
}

/// The `[report]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportSection {
    pub max_value_length: usize,
    pub fail_on_drift: bool,
}

impl Default for ReportSection {
    fn default() -> Self {
        Self {
            max_value_length: DEFAULT_MAX_VALUE_LENGTH,
            fail_on_drift: true,
        }
    }
}
