//! CLI error types with miette diagnostics.
//!
//! Maps core and config errors into user-facing errors with help text.

use miette::Diagnostic;
use thiserror::Error;

use goyanova_config::ConfigError;
use goyanova_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const INVALID_SCHEDULE: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Input ────────────────────────────────────────────────────────
    #[error("File not found: {path}")]
    #[diagnostic(
        code(goyanova::not_found),
        help("Pass a path to a JSON or YAML file, or '-' to read stdin.")
    )]
    NotFound { path: String },

    #[error("Could not parse {path}: {reason}")]
    #[diagnostic(
        code(goyanova::invalid_input),
        help("Files ending in .json are read as JSON, .yaml/.yml as YAML; others are sniffed.")
    )]
    InvalidInput { path: String, reason: String },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(goyanova::validation))]
    Validation { field: String, reason: String },

    // ── Schedule ─────────────────────────────────────────────────────
    #[error("Schedule cannot be submitted: {summary}")]
    #[diagnostic(
        code(goyanova::invalid_schedule),
        help("Enable at least one day and give every enabled day a complete slot.")
    )]
    InvalidSchedule { summary: String },

    #[error("Session step {step} failed")]
    #[diagnostic(
        code(goyanova::session_step),
        help("Check the order of operations: slot edits need an open modal, day toggles need it closed.")
    )]
    SessionStep {
        step: usize,
        #[source]
        source: CoreError,
    },

    #[error(transparent)]
    #[diagnostic(code(goyanova::editor))]
    Core(#[from] CoreError),

    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(
        code(goyanova::config),
        help("Inspect the file with: goyanova config show\nRecreate it with: goyanova config init")
    )]
    Config(#[from] ConfigError),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Could not serialize config: {0}")]
    #[diagnostic(code(goyanova::toml))]
    Toml(#[from] toml::ser::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::InvalidSchedule { .. } => exit_code::INVALID_SCHEDULE,
            Self::InvalidInput { .. } | Self::Validation { .. } => exit_code::USAGE,
            Self::Core(err) | Self::SessionStep { source: err, .. } if err.is_validation() => {
                exit_code::INVALID_SCHEDULE
            }
            _ => exit_code::GENERAL,
        }
    }
}
