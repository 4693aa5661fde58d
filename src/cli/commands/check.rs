use std::path::{Path, PathBuf};

use tracing::debug;

use crate::adapters::loaders::environment_loader::EnvironmentLoader;
use crate::adapters::reporters::json_reporter::JsonReporter;
use crate::adapters::reporters::markdown_reporter::MarkdownReporter;
use crate::adapters::rules::file_rule_source::FileRuleSource;
use crate::cli::ReportFormat;
use crate::cli::output;
use crate::config::app_config::AppConfig;
use crate::core::errors::{DriftError, Result};
use crate::core::models::difference::ComparisonReport;
use crate::core::services::comparison_service::ComparisonService;
use crate::core::traits::reporter::{ReportContext, Reporter};
use crate::core::traits::rule_source::RuleSource;

/// Report file written by a bare `-o`, relative to the config directory.
pub const DEFAULT_REPORT_NAME: &str = "report.md";

/// Options for `driftspec check`, gathered from the command line.
pub struct CheckOptions<'a> {
    pub env_paths: &'a [PathBuf],
    pub output: Option<&'a Path>,
    pub format: ReportFormat,
    pub no_fail: bool,
    pub exclude_dirs: &'a [String],
    pub max_value_length: Option<usize>,
    pub trim_cell: bool,
    pub quiet: bool,
}

/// Execute the `driftspec check` command.
///
/// Loads every environment and the ignore rules, compares the environments
/// against the baseline, then prints rule warnings, the report, and a
/// summary.
///
/// # Errors
///
/// `DriftDetected` when unignored differences exist, unless `--no-fail`
/// is given or `fail_on_drift = false` is configured.
pub fn execute(config_dir: &Path, opts: &CheckOptions<'_>) -> Result<()> {
    let config = AppConfig::load(config_dir)?;

    let rules = FileRuleSource::new(config_dir.join(config.ignore_name())).load()?;

    let environments = EnvironmentLoader::new(".", config_dir)
        .with_excludes(opts.exclude_dirs.to_vec())
        .load(opts.env_paths, &config)?;

    let report = ComparisonService.run(&environments, &rules.patterns())?;

    let max_value_length = opts
        .max_value_length
        .unwrap_or(config.report.max_value_length);
    if max_value_length == 0 {
        return Err(DriftError::InvalidConfig {
            detail: "--max-value-length must be greater than zero".into(),
        });
    }

    let reporter: Box<dyn Reporter> = match opts.format {
        ReportFormat::Markdown => Box::new(MarkdownReporter),
        ReportFormat::Json => Box::new(JsonReporter),
    };
    let rendered = reporter.render(
        &report,
        &ReportContext {
            rules: &rules,
            max_value_length,
            trim_cell: opts.trim_cell,
        },
    )?;

    if !opts.quiet {
        output::header("🔍 driftspec check");
        println!("  Environments: {}", report.environments.join(", "));
        if let Some(baseline) = &report.baseline {
            println!("  Baseline: {baseline}");
        } else {
            output::warning("Fewer than two environments; nothing to compare");
        }
        for warning in &report.warnings {
            output::warning(&warning.to_string());
        }
    }

    match opts.output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, &rendered)?;
            debug!(path = %path.display(), format = reporter.extension(), "report written");
            if !opts.quiet {
                output::success(&format!("Report written to {}", path.display()));
            }
        }
        None if !opts.quiet => {
            println!();
            print!("{rendered}");
        }
        None => {}
    }

    if !opts.quiet {
        print_summary(&report);
    }

    let fail = !opts.no_fail && config.report.fail_on_drift;
    if fail && report.has_drift() {
        return Err(DriftError::DriftDetected {
            count: report.drift_count(),
        });
    }

    Ok(())
}

fn print_summary(report: &ComparisonReport) {
    output::header("Summary");
    output::count("Intentional differences", report.ignored_count(), false);
    output::count("Drift", report.drift_count(), true);

    if report.is_empty() {
        output::success("Environments are identical");
    } else if !report.has_drift() {
        output::success("No drift detected");
    }
}
