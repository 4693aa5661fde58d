mod adapters;
mod cli;
mod config;
mod core;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::commands::check::{CheckOptions, DEFAULT_REPORT_NAME};
use cli::{Cli, Commands};

fn main() {
    let args = Cli::parse();

    init_tracing(args.verbose);
    cli::context::init(args.config.as_deref());
    let config_dir = cli::context::driftspec_dir();

    let result = match &args.command {
        Commands::Init => cli::commands::init::execute(config_dir, args.verbose),
        Commands::Check {
            env_paths,
            output,
            format,
            no_fail,
            exclude_dirs,
            max_value_length,
            trim_cell,
        } => {
            let output = output.as_ref().map(|path| {
                path.clone()
                    .unwrap_or_else(|| config_dir.join(DEFAULT_REPORT_NAME))
            });
            cli::commands::check::execute(
                config_dir,
                &CheckOptions {
                    env_paths,
                    output: output.as_deref(),
                    format: *format,
                    no_fail: *no_fail,
                    exclude_dirs,
                    max_value_length: *max_value_length,
                    trim_cell: *trim_cell,
                    quiet: args.quiet,
                },
            )
        }
        Commands::Rules {
            env_paths,
            exclude_dirs,
        } => cli::commands::rules::execute(config_dir, env_paths, exclude_dirs),
    };

    if let Err(e) = result {
        cli::output::error(&format!("Error: {e}"));
        std::process::exit(1);
    }
}

/// Diagnostics go to stderr; `RUST_LOG` overrides the verbosity flag.
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "driftspec=debug"
    } else {
        "driftspec=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}
