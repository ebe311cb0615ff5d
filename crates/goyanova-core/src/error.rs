// ── Core error types ──
//
// Errors returned by the availability editor. Conversions never fail;
// these only report operations that are illegal in the editor's current
// phase, or a modal confirmation blocked by slot validation.

use thiserror::Error;

use crate::model::DayKey;
use crate::validate::SlotFieldError;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Phase errors ─────────────────────────────────────────────────
    #[error("A modal editing session is open for {day}")]
    ModalOpen { day: DayKey },

    #[error("No modal editing session is open")]
    NoModalOpen,

    // ── Input errors ─────────────────────────────────────────────────
    #[error("Day {day} is disabled")]
    DayDisabled { day: DayKey },

    #[error("Slot {index} out of range ({len} slots in session)")]
    SlotOutOfRange { index: usize, len: usize },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Slots for {day} rejected: {}", summarize(.errors))]
    SlotsRejected {
        day: DayKey,
        errors: Vec<SlotFieldError>,
    },
}

fn summarize(errors: &[SlotFieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl CoreError {
    /// True for errors the user resolves by fixing input in the modal.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::SlotsRejected { .. })
    }
}
