// ── Editor phase guard ──

use crate::model::{DayKey, TimeSlot};
use crate::validate::{SlotField, SlotFieldError};

/// What the editor is doing right now. Gates which operations are legal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditorPhase {
    /// Accepts toggles, mode/message changes, external updates, emission.
    #[default]
    Idle,
    /// A day's modal is open. Only slot edits, confirm and cancel apply;
    /// external updates and emission are held off.
    ModalEditing(ModalSession),
    /// External data is being applied. Only held inside
    /// [`AvailabilityEditor::receive`](super::AvailabilityEditor::receive),
    /// so callers never observe it.
    Reconciling,
}

impl EditorPhase {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn modal_day(&self) -> Option<DayKey> {
        match self {
            Self::ModalEditing(session) => Some(session.day),
            Self::Idle | Self::Reconciling => None,
        }
    }

    pub fn session(&self) -> Option<&ModalSession> {
        match self {
            Self::ModalEditing(session) => Some(session),
            Self::Idle | Self::Reconciling => None,
        }
    }
}

/// Working copy of one day's slots while its modal is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalSession {
    pub(crate) day: DayKey,
    pub(crate) draft: Vec<TimeSlot>,
    pub(crate) errors: Vec<SlotFieldError>,
}

impl ModalSession {
    pub(crate) fn new(day: DayKey, mut draft: Vec<TimeSlot>) -> Self {
        if draft.is_empty() {
            draft.push(TimeSlot::default());
        }
        Self {
            day,
            draft,
            errors: Vec::new(),
        }
    }

    pub fn day(&self) -> DayKey {
        self.day
    }

    pub fn draft(&self) -> &[TimeSlot] {
        &self.draft
    }

    /// Field markers from the last rejected confirm.
    pub fn errors(&self) -> &[SlotFieldError] {
        &self.errors
    }

    /// Drop markers for one field once the user touches it.
    pub(crate) fn clear_field_errors(&mut self, slot: usize, field: SlotField) {
        self.errors.retain(|e| !(e.slot == slot && e.field == field));
    }
}
