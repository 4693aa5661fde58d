use std::path::{Path, PathBuf};

use colored::Colorize;

use crate::adapters::loaders::environment_loader::EnvironmentLoader;
use crate::adapters::rules::file_rule_source::FileRuleSource;
use crate::cli::output;
use crate::config::app_config::AppConfig;
use crate::core::errors::Result;
use crate::core::services::ignore_matcher::IgnoreMatcher;
use crate::core::traits::rule_source::RuleSource;

/// Execute the `driftspec rules` command.
///
/// Lists every ignore rule with its comment and marks the rules that
/// reference nothing in the resolved environments.
pub fn execute(config_dir: &Path, env_paths: &[PathBuf], exclude_dirs: &[String]) -> Result<()> {
    let config = AppConfig::load(config_dir)?;
    let ignore_path = config_dir.join(config.ignore_name());
    let rules = FileRuleSource::new(&ignore_path).load()?;

    output::header("📋 driftspec rules");
    println!(
        "  Config version: {} (format {})",
        config.driftspec.version, config.driftspec.format_version
    );

    if rules.is_empty() {
        output::warning(&format!("No ignore rules in {}", ignore_path.display()));
        return Ok(());
    }

    let environments = EnvironmentLoader::new(".", config_dir)
        .with_excludes(exclude_dirs.to_vec())
        .load(env_paths, &config)?;

    let mut matcher = IgnoreMatcher::new(&rules.patterns());
    matcher.validate_rules(&environments);
    let stale: Vec<String> = matcher
        .warnings()
        .iter()
        .map(|w| w.rule.clone())
        .collect();

    let names: Vec<&str> = environments.keys().map(String::as_str).collect();
    println!("  Checked against: {}\n", names.join(", "));

    for rule in rules.iter() {
        let marker = if stale.contains(&rule.pattern) {
            "⚠".yellow()
        } else {
            "✓".green()
        };
        println!("  {marker} {}", rule.pattern);
        if let Some(comment) = &rule.comment {
            for line in comment.lines() {
                println!("      {}", line.dimmed());
            }
        }
    }

    println!();
    if stale.is_empty() {
        output::success(&format!("All {} rules match the current configuration", rules.len()));
    } else {
        output::warning(&format!(
            "{} of {} rules match nothing in the current configuration",
            stale.len(),
            rules.len()
        ));
    }

    Ok(())
}
