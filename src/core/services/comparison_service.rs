use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::core::errors::Result;
use crate::core::models::difference::ComparisonReport;
use crate::core::models::environment::EnvironmentConfig;
use crate::core::services::differ::Differ;
use crate::core::services::ignore_matcher::IgnoreMatcher;

/// Compares a set of environments against their baseline in one run.
pub struct ComparisonService;

impl ComparisonService {
    /// Run a full drift check.
    ///
    /// - The baseline is the lexicographically first environment name
    /// - Ignore rules are validated once against every environment
    /// - Rule warnings travel beside the differences, never inside them
    ///
    /// Each call owns a fresh matcher, so warnings never leak between runs.
    pub fn run(
        &self,
        environments: &BTreeMap<String, EnvironmentConfig>,
        rules: &[String],
    ) -> Result<ComparisonReport> {
        let mut matcher = IgnoreMatcher::new(rules);
        let warnings = matcher.validate_rules(environments).to_vec();

        let differences = Differ::new(&matcher).compare(environments)?;

        let names: Vec<String> = environments.keys().cloned().collect();
        let baseline = if names.len() >= 2 {
            names.first().cloned()
        } else {
            None
        };

        let report = ComparisonReport {
            baseline,
            environments: names,
            differences,
            warnings,
        };

        info!(
            environments = report.environments.len(),
            drift = report.drift_count(),
            ignored = report.ignored_count(),
            "comparison finished"
        );
        debug!(warnings = report.warnings.len(), "rule validation warnings");

        Ok(report)
    }
}
