use std::path::Path;

use crate::cli::output;
use crate::config::app_config::DEFAULT_IGNORE_NAME;
use crate::core::errors::{DriftError, Result};

const CONFIG_TEMPLATE: &str = r#"[driftspec]
version = "0.1.0"
format_version = 1
ignore = ".driftignore"

# Environments are auto-detected from <dir>/main.json or <dir>/main.toml.
# Declare them here to point at specific files instead:
#
# [environments]
# dev = { file = "envs/dev.json" }
# prod = { file = "envs/prod.toml" }

[report]
max_value_length = 200
fail_on_drift = true
"#;

const IGNORE_TEMPLATE: &str = "\
# Intentional differences between environments, one path per line.
# Comment lines directly above a rule explain it in the report.
#
# Examples:
#   aws_instance.web.instance_type         # sized per environment
#   aws_security_group.web.ingress[0]
#   module.vpc.cidr
";

/// Execute the `driftspec init` command.
///
/// Creates the config directory with a default `config.toml` and an
/// annotated ignore file.
pub fn execute(config_dir: &Path, verbose: bool) -> Result<()> {
    if config_dir.exists() {
        return Err(DriftError::InvalidConfig {
            detail: format!(
                "driftspec is already initialized in this project ({} exists)",
                config_dir.display()
            ),
        });
    }

    output::header("driftspec: initializing project");

    std::fs::create_dir_all(config_dir)?;
    output::success(&format!("Created {}/", config_dir.display()));

    std::fs::write(config_dir.join("config.toml"), CONFIG_TEMPLATE)?;
    output::success("Generated config.toml with defaults");

    std::fs::write(config_dir.join(DEFAULT_IGNORE_NAME), IGNORE_TEMPLATE)?;
    output::success(&format!("Created {DEFAULT_IGNORE_NAME}"));

    output::success("Project ready.\n");
    print_next_steps(config_dir, verbose);

    Ok(())
}

/// Print next steps after init.
fn print_next_steps(config_dir: &Path, verbose: bool) {
    println!("  Next steps:");
    println!("     1. Export each environment to <env>/main.json");
    println!("     2. Run 'driftspec check' to compare them");
    println!(
        "     3. Record intentional differences in {}/{DEFAULT_IGNORE_NAME}",
        config_dir.display()
    );

    if verbose {
        println!();
        println!("  Files created:");
        println!(
            "     {}/config.toml     driftspec configuration",
            config_dir.display()
        );
        println!(
            "     {}/{DEFAULT_IGNORE_NAME}    intentional differences",
            config_dir.display()
        );
    }
}
