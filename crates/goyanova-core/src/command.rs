// ── Command API ──
//
// Every user interaction or parent update the editor understands, as one
// serializable enum. Lets a session be recorded and replayed as data.

use serde::{Deserialize, Serialize};

use crate::editor::{AvailabilityEditor, ExternalUpdate};
use crate::error::CoreError;
use crate::model::{DayKey, FormState, ScheduleMode};
use crate::validate::SlotField;

/// One step against an [`AvailabilityEditor`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum EditorCommand {
    // ── Step-level controls ──────────────────────────────────────────
    ToggleDay {
        day: DayKey,
        enabled: bool,
    },
    SetMode {
        mode: ScheduleMode,
    },
    SetMessage {
        message: String,
    },

    // ── Modal session ────────────────────────────────────────────────
    OpenModal {
        day: DayKey,
    },
    AddSlot,
    RemoveSlot {
        index: usize,
    },
    EditSlot {
        index: usize,
        field: SlotField,
        value: String,
    },
    ConfirmModal {
        #[serde(default, alias = "copyToRestOfWeek")]
        copy_to_rest_of_week: bool,
    },
    CancelModal,

    // ── Parent form ──────────────────────────────────────────────────
    Receive {
        form: FormState,
    },
}

/// What applying a command did, beyond any emission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum CommandOutcome {
    Ok,
    /// A confirmed modal was copied onto these days.
    Copied { days: Vec<DayKey> },
    External { update: ExternalUpdate },
}

impl AvailabilityEditor {
    /// Route a command to the matching editor operation.
    pub fn apply(&mut self, command: EditorCommand) -> Result<CommandOutcome, CoreError> {
        match command {
            EditorCommand::ToggleDay { day, enabled } => self.toggle_day(day, enabled)?,
            EditorCommand::SetMode { mode } => self.set_mode(mode)?,
            EditorCommand::SetMessage { message } => self.set_message(message)?,
            EditorCommand::OpenModal { day } => self.open_modal(day)?,
            EditorCommand::AddSlot => self.add_slot()?,
            EditorCommand::RemoveSlot { index } => self.remove_slot(index)?,
            EditorCommand::EditSlot {
                index,
                field,
                value,
            } => self.edit_slot(index, field, value)?,
            EditorCommand::ConfirmModal {
                copy_to_rest_of_week,
            } => {
                let days = self.confirm_modal(copy_to_rest_of_week)?;
                if !days.is_empty() {
                    return Ok(CommandOutcome::Copied { days });
                }
            }
            EditorCommand::CancelModal => self.cancel_modal()?,
            EditorCommand::Receive { form } => {
                let update = self.receive(&form);
                return Ok(CommandOutcome::External { update });
            }
        }
        Ok(CommandOutcome::Ok)
    }
}
