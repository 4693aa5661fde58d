use std::path::PathBuf;

/// All domain errors for driftspec.
///
/// Each variant provides enough context to diagnose the issue
/// without needing a debugger.
#[derive(Debug, thiserror::Error)]
pub enum DriftError {
    #[error(
        "File not found: {path}\n\n  \
         Check that the path is correct and the file exists.\n  \
         Environment files must be .json or .toml documents."
    )]
    FileNotFound { path: PathBuf },

    #[error(
        "Parse error in {file}: {detail}\n\n  \
         Environment documents contain the sections: resources, data_sources,\n  \
         modules, locals, variables, outputs."
    )]
    ParseError { file: PathBuf, detail: String },

    #[error(
        "Environment '{environment}' is malformed: {detail}\n\n  \
         Every resource and data source needs a type and a name, and every\n  \
         module, variable, output and local needs a unique name."
    )]
    MalformedEnvironment { environment: String, detail: String },

    #[error(
        "Invalid environment name '{name}'\n\n  \
         Environment names may only contain letters, digits, '-', '_' and '.'."
    )]
    InvalidEnvironmentName { name: String },

    #[error(
        "No environments found\n\n  \
         driftspec searched:\n    \
         {searched}\n\n  \
         Solutions:\n    \
         → Pass environment files or directories: driftspec check envs/dev envs/prod\n    \
         → Declare them in .driftspec/config.toml under [environments]\n    \
         → Create <env>/main.json or <env>/main.toml directories"
    )]
    NoEnvironments { searched: String },

    #[error(
        "Unsupported environment file: {path}\n\n  \
         Supported extensions: .json, .toml"
    )]
    UnsupportedFormat { path: PathBuf },

    #[error("Invalid configuration: {detail}")]
    InvalidConfig { detail: String },

    #[error(
        "This project uses format version {project_version}, but your driftspec \
         only supports up to version {supported_version}.\n\n  \
         Solutions:\n    \
         → Install latest: cargo install driftspec --force"
    )]
    FormatVersionTooNew {
        project_version: u32,
        supported_version: u32,
    },

    #[error(
        "{count} configuration drift(s) detected\n\n  \
         Declare intentional differences in .driftspec/.driftignore,\n  \
         or pass --no-fail to report without failing."
    )]
    DriftDetected { count: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DriftError>;
