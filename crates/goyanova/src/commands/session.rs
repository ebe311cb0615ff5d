//! Session replay: drive an `AvailabilityEditor` from a command script.

use std::sync::Arc;

use serde::Serialize;
use tabled::Tabled;
use tracing::{debug, warn};

use goyanova_core::{AvailabilityEditor, AvailabilityPayload, EditorCommand, FormState};

use crate::cli::SessionArgs;
use crate::config::Settings;
use crate::error::CliError;
use crate::output;

use super::util;

/// A payload the editor pushed to the parent, tagged with the step that
/// caused it (1-based).
#[derive(Debug, Serialize)]
struct Emission {
    step: usize,
    payload: Arc<AvailabilityPayload>,
}

#[derive(Tabled)]
struct EmissionRow {
    #[tabled(rename = "Step")]
    step: usize,
    #[tabled(rename = "Mode")]
    mode: String,
    #[tabled(rename = "Days on")]
    days_on: String,
    #[tabled(rename = "Rows")]
    rows: usize,
}

impl From<&Emission> for EmissionRow {
    fn from(e: &Emission) -> Self {
        let days_on: Vec<&str> = e
            .payload
            .dias_activos
            .iter()
            .filter(|(_, on)| **on)
            .map(|(day, _)| day.as_str())
            .collect();
        Self {
            step: e.step,
            mode: e.payload.tipo_disponibilidad.label().to_owned(),
            days_on: days_on.join(", "),
            rows: e.payload.disponibilidades.len(),
        }
    }
}

/// Run `script` against a fresh editor and collect its emissions.
///
/// Rejected modal confirms are reported and skipped, the way a user would
/// see inline errors and keep typing. Any other failure aborts the replay.
fn replay(
    initial: &FormState,
    script: Vec<EditorCommand>,
    quiet: bool,
) -> Result<(AvailabilityEditor, Vec<Emission>), CliError> {
    let mut editor = AvailabilityEditor::new(initial);
    let mut rx = editor.subscribe();
    let mut emissions = Vec::new();

    for (i, command) in script.into_iter().enumerate() {
        let step = i + 1;
        debug!(step, ?command, "applying");
        match editor.apply(command) {
            Ok(outcome) => debug!(step, ?outcome, "applied"),
            Err(err) if err.is_validation() => {
                warn!(step, %err, "modal confirm rejected");
                if !quiet {
                    eprintln!("step {step}: {err}");
                }
            }
            Err(source) => return Err(CliError::SessionStep { step, source }),
        }
        if rx.has_changed().unwrap_or(false) {
            if let Some(payload) = rx.borrow_and_update().clone() {
                emissions.push(Emission { step, payload });
            }
        }
    }
    Ok((editor, emissions))
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: SessionArgs, settings: &Settings) -> Result<(), CliError> {
    let script: Vec<EditorCommand> = util::read_document(&args.script)?;
    let initial: FormState = match &args.initial {
        Some(path) => util::read_document(path)?,
        None => FormState::default(),
    };

    let commands = script.len();
    let (editor, emissions) = replay(&initial, script, settings.quiet)?;
    if !settings.quiet {
        eprintln!("{commands} commands, {} emissions", emissions.len());
    }

    let out = if args.final_only {
        match editor.last_emitted() {
            Some(payload) => output::render_single(
                settings.output,
                payload,
                output::render_json_compact,
                output::render_json_compact,
            ),
            None => String::new(),
        }
    } else {
        output::render_list(
            settings.output,
            &emissions,
            |e| EmissionRow::from(e),
            |e| format!("{} {}", e.step, output::render_json_compact(&*e.payload)),
        )
    };
    output::print_output(&out, settings.quiet);
    Ok(())
}
