use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::adapters::parsers::ignore_parser::parse_ignore_content;
use crate::core::errors::{DriftError, Result};
use crate::core::models::ignore_rule::IgnoreRuleSet;
use crate::core::traits::rule_source::RuleSource;

/// Loads ignore rules from a file, or from every `*.txt` file in a directory.
///
/// Directory entries are read in file-name order; when a rule appears more
/// than once, its first declaration (and comment) wins.
pub struct FileRuleSource {
    path: PathBuf,
}

impl FileRuleSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn rule_files(&self) -> Result<Vec<PathBuf>> {
        if self.path.is_file() {
            return Ok(vec![self.path.clone()]);
        }
        if !self.path.is_dir() {
            debug!(path = %self.path.display(), "no ignore rules found");
            return Ok(Vec::new());
        }

        let mut files: Vec<PathBuf> = fs::read_dir(&self.path)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && has_txt_extension(path))
            .collect();
        files.sort();
        Ok(files)
    }
}

fn has_txt_extension(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "txt")
}

impl RuleSource for FileRuleSource {
    fn load(&self) -> Result<IgnoreRuleSet> {
        let mut set = IgnoreRuleSet::new();

        for file in self.rule_files()? {
            let content = fs::read_to_string(&file).map_err(|e| DriftError::ParseError {
                file: file.clone(),
                detail: e.to_string(),
            })?;
            for rule in parse_ignore_content(&content) {
                if !set.push(rule.clone()) {
                    debug!(rule = %rule.pattern, file = %file.display(), "duplicate ignore rule skipped");
                }
            }
        }

        debug!(path = %self.path.display(), rules = set.len(), "loaded ignore rules");
        Ok(set)
    }
}
