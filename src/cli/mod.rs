pub mod commands;
pub mod context;
pub mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Catch unintended configuration drift between your environments.
#[derive(Parser, Debug)]
#[command(name = "driftspec", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output (debug diagnostics on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode: only show errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to an alternative config directory (default: .driftspec)
    #[arg(long, global = true, env = "DRIFTSPEC_CONFIG")]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize driftspec in the current project
    Init,

    /// Compare every environment against the baseline and report drift
    Check {
        /// Environment files or directories (default: auto-detect)
        env_paths: Vec<PathBuf>,

        /// Write the report to a file instead of stdout
        /// (bare `-o` writes `<config dir>/report.md`)
        #[arg(short, long, num_args = 0..=1, value_name = "FILE")]
        output: Option<Option<PathBuf>>,

        /// Report format
        #[arg(long, value_enum, default_value_t = ReportFormat::Markdown)]
        format: ReportFormat,

        /// Exit successfully even when drift is found
        #[arg(long)]
        no_fail: bool,

        /// Directories to skip during auto-detection (comma separated)
        #[arg(short, long, value_delimiter = ',')]
        exclude_dirs: Vec<String>,

        /// Truncate report cells longer than this many characters
        #[arg(long)]
        max_value_length: Option<usize>,

        /// Drop the padding around Markdown table cells
        #[arg(long)]
        trim_cell: bool,
    },

    /// List ignore rules and flag those that match nothing
    Rules {
        /// Environment files or directories (default: auto-detect)
        env_paths: Vec<PathBuf>,

        /// Directories to skip during auto-detection (comma separated)
        #[arg(short, long, value_delimiter = ',')]
        exclude_dirs: Vec<String>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Markdown,
    Json,
}
