//! CLI configuration: thin wrapper around `goyanova_config`.
//!
//! Resolves display settings with flag > env > config file > built-in
//! default precedence.

use clap::ValueEnum;
use tracing::debug;

use goyanova_core::Locale;

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use goyanova_config::{
    Config, Defaults, config_path, load_config, load_config_or_default, save_config,
};

// ── Resolved settings ───────────────────────────────────────────────

/// Everything a command handler needs to know about presentation.
#[derive(Debug, Clone, Copy)]
pub struct Settings {
    pub output: OutputFormat,
    pub color: ColorMode,
    pub locale: Locale,
    pub quiet: bool,
    pub yes: bool,
}

/// Merge global flags over the loaded config.
pub fn resolve(global: &GlobalOpts, cfg: &Config) -> Result<Settings, CliError> {
    let output = match global.output {
        Some(output) => output,
        None => parse_value::<OutputFormat>("output", &cfg.defaults.output)?,
    };
    let color = match global.color {
        Some(color) => color,
        None => parse_value::<ColorMode>("color", &cfg.defaults.color)?,
    };
    let locale = match global.locale.as_deref() {
        Some(raw) => goyanova_config::parse_locale(raw)?,
        None => cfg.defaults.locale()?,
    };
    debug!(?output, ?color, ?locale, "resolved display settings");
    Ok(Settings {
        output,
        color,
        locale,
        quiet: global.quiet,
        yes: global.yes,
    })
}

fn parse_value<T: ValueEnum>(field: &str, raw: &str) -> Result<T, CliError> {
    T::from_str(raw.trim(), true).map_err(|reason| CliError::Validation {
        field: format!("defaults.{field}"),
        reason,
    })
}
