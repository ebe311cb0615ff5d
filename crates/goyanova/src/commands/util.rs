//! Shared helpers for command handlers.

use std::io::Read;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocFormat {
    Json,
    Yaml,
}

/// Pick a parser from the extension, else from the first non-blank byte.
fn detect_format(path: &Path, contents: &str) -> DocFormat {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => DocFormat::Json,
        Some("yaml" | "yml") => DocFormat::Yaml,
        _ => match contents.trim_start().chars().next() {
            Some('[' | '{') => DocFormat::Json,
            _ => DocFormat::Yaml,
        },
    }
}

/// Read a JSON or YAML document from `path`, or stdin when it is `-`.
pub fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let display = path.display().to_string();
    let contents = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CliError::NotFound { path: display });
            }
            Err(e) => return Err(e.into()),
        }
    };

    let format = detect_format(path, &contents);
    debug!(path = %path.display(), ?format, bytes = contents.len(), "parsing document");
    let parsed = match format {
        DocFormat::Json => serde_json::from_str(&contents).map_err(|e| e.to_string()),
        DocFormat::Yaml => serde_yaml::from_str(&contents).map_err(|e| e.to_string()),
    };
    parsed.map_err(|reason| CliError::InvalidInput {
        path: display,
        reason,
    })
}

/// Prompt for a choice, taking the default when `--yes` was passed.
pub fn select(prompt: &str, items: &[&str], default: usize, yes: bool) -> Result<usize, CliError> {
    if yes {
        return Ok(default);
    }
    dialoguer::Select::new()
        .with_prompt(prompt)
        .items(items)
        .default(default)
        .interact()
        .map_err(|e| CliError::Validation {
            field: "interactive".into(),
            reason: format!("prompt failed: {e}"),
        })
}
