use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::adapters::parsers::json_parser::JsonEnvironmentParser;
use crate::adapters::parsers::toml_parser::TomlEnvironmentParser;
use crate::cli::context::validate_env_name;
use crate::config::app_config::AppConfig;
use crate::core::errors::{DriftError, Result};
use crate::core::models::environment::EnvironmentConfig;
use crate::core::traits::parser::EnvironmentParser;

/// Entry-point file names looked up inside an environment directory.
const MAIN_FILES: [&str; 2] = ["main.json", "main.toml"];

/// A named environment and the document it is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentSource {
    pub name: String,
    pub file: PathBuf,
}

/// Finds environment documents and parses them into the entity model.
///
/// Sources are resolved in order of precedence: explicit paths, then the
/// `[environments]` table, then sub-directories of the project root that
/// hold a `main.json` or `main.toml`.
pub struct EnvironmentLoader {
    root: PathBuf,
    config_dir: PathBuf,
    exclude_dirs: Vec<String>,
    parsers: Vec<Box<dyn EnvironmentParser>>,
}

impl EnvironmentLoader {
    pub fn new(root: impl Into<PathBuf>, config_dir: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            config_dir: config_dir.into(),
            exclude_dirs: Vec::new(),
            parsers: vec![Box::new(JsonEnvironmentParser), Box::new(TomlEnvironmentParser)],
        }
    }

    /// Directory names skipped during auto-discovery.
    pub fn with_excludes(mut self, exclude_dirs: Vec<String>) -> Self {
        self.exclude_dirs = exclude_dirs;
        self
    }

    /// Resolve and parse every environment.
    pub fn load(
        &self,
        paths: &[PathBuf],
        config: &AppConfig,
    ) -> Result<BTreeMap<String, EnvironmentConfig>> {
        let sources = self.resolve_sources(paths, config)?;
        let mut environments = BTreeMap::new();
        for source in sources {
            let env = self.load_file(&source.file)?;
            debug!(
                environment = %source.name,
                file = %source.file.display(),
                entities = env.entity_count(),
                "loaded environment"
            );
            environments.insert(source.name, env);
        }
        Ok(environments)
    }

    /// Work out which environments to compare and where their documents are.
    ///
    /// # Errors
    ///
    /// - `FileNotFound` for an explicit path that does not exist
    /// - `InvalidEnvironmentName` when a derived name is unsafe
    /// - `InvalidConfig` when two sources claim the same name
    /// - `NoEnvironments` when nothing was found
    pub fn resolve_sources(
        &self,
        paths: &[PathBuf],
        config: &AppConfig,
    ) -> Result<Vec<EnvironmentSource>> {
        let (sources, searched) = if !paths.is_empty() {
            let sources = paths
                .iter()
                .map(|p| self.source_from_path(p))
                .collect::<Result<Vec<_>>>()?;
            (sources, "the paths given on the command line".to_string())
        } else if !config.environments.is_empty() {
            let sources = config
                .environments
                .iter()
                .map(|(name, entry)| EnvironmentSource {
                    name: name.clone(),
                    file: self.root.join(&entry.file),
                })
                .collect();
            (sources, "[environments] in config.toml".to_string())
        } else {
            (
                self.discover()?,
                format!("sub-directories of {}", self.root.display()),
            )
        };

        let mut seen: BTreeMap<&str, &Path> = BTreeMap::new();
        for source in &sources {
            validate_env_name(&source.name)?;
            if let Some(previous) = seen.insert(source.name.as_str(), source.file.as_path()) {
                return Err(DriftError::InvalidConfig {
                    detail: format!(
                        "environment '{}' is defined twice ({} and {})",
                        source.name,
                        previous.display(),
                        source.file.display()
                    ),
                });
            }
        }

        if sources.is_empty() {
            return Err(DriftError::NoEnvironments { searched });
        }
        Ok(sources)
    }

    /// Parse one environment document, choosing the parser by extension.
    pub fn load_file(&self, path: &Path) -> Result<EnvironmentConfig> {
        if !path.is_file() {
            return Err(DriftError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        let parser = self
            .parsers
            .iter()
            .find(|p| p.supported_extensions().contains(&extension))
            .ok_or_else(|| DriftError::UnsupportedFormat {
                path: path.to_path_buf(),
            })?;

        let content = fs::read_to_string(path)?;
        parser.parse(&content).map_err(|e| match e {
            DriftError::ParseError { detail, .. } => DriftError::ParseError {
                file: path.to_path_buf(),
                detail,
            },
            other => other,
        })
    }

    fn source_from_path(&self, path: &Path) -> Result<EnvironmentSource> {
        if path.is_dir() {
            let file = main_file(path).ok_or_else(|| DriftError::FileNotFound {
                path: path.join(MAIN_FILES[0]),
            })?;
            return Ok(EnvironmentSource {
                name: dir_name(path)?,
                file,
            });
        }
        if !path.exists() {
            return Err(DriftError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| DriftError::InvalidEnvironmentName {
                name: path.display().to_string(),
            })?;
        Ok(EnvironmentSource {
            name: name.to_string(),
            file: path.to_path_buf(),
        })
    }

    fn discover(&self) -> Result<Vec<EnvironmentSource>> {
        let config_dir_name = self.config_dir.file_name();
        let mut dirs: Vec<PathBuf> = fs::read_dir(&self.root)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .collect();
        dirs.sort();

        let mut sources = Vec::new();
        for dir in dirs {
            let Some(name) = dir.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if name.starts_with('.')
                || dir.file_name() == config_dir_name
                || self.exclude_dirs.iter().any(|e| e == name)
            {
                debug!(dir = %dir.display(), "skipping directory");
                continue;
            }

            match main_file(&dir) {
                Some(file) => sources.push(EnvironmentSource {
                    name: name.to_string(),
                    file,
                }),
                None => warn!(
                    dir = %dir.display(),
                    "skipping directory without main.json or main.toml"
                ),
            }
        }
        Ok(sources)
    }
}

fn main_file(dir: &Path) -> Option<PathBuf> {
    MAIN_FILES
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
}

fn dir_name(path: &Path) -> Result<String> {
    let resolved = match path.file_name() {
        Some(_) => path.to_path_buf(),
        None => fs::canonicalize(path)?,
    };
    resolved
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| DriftError::InvalidEnvironmentName {
            name: path.display().to_string(),
        })
}
