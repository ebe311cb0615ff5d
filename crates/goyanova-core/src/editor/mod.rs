// ── Availability editor ──
//
// Owns the schedule while the wizard's availability step is mounted.
// Three mechanisms keep it from fighting the parent form:
//   - every mutation ends in derive -> compare -> emit-if-different
//   - incoming forms equal to the last emission are ignored (self-echo)
//   - nothing external is applied while a modal session is open

mod outbox;
mod phase;

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::debug;

use crate::convert::{derive_payload, schedule_from_form, sort_by_start};
use crate::error::CoreError;
use crate::model::{AvailabilityPayload, DayKey, FormState, ScheduleMode, ScheduleState, TimeSlot};
use crate::validate::{DayIssue, SlotField, SlotFieldError, validate_for_submit, validate_slots};

use outbox::PayloadOutbox;
pub use phase::{EditorPhase, ModalSession};

/// How the editor treated an incoming form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "kebab-case")]
pub enum ExternalUpdate {
    /// A modal was open for `day`; nothing changed.
    Blocked { day: DayKey },
    /// The form is the editor's own last emission handed back.
    SelfEcho,
    /// Parent re-rendered without a genuine change.
    Unchanged,
    /// Local state was replaced by the incoming data.
    Reset,
}

/// Stateful controller for the availability step.
///
/// All operations take `&mut self`; the parent drives it from a single
/// thread. Emitted payloads are observable through [`subscribe`] and
/// [`last_emitted`].
///
/// [`subscribe`]: AvailabilityEditor::subscribe
/// [`last_emitted`]: AvailabilityEditor::last_emitted
#[derive(Debug)]
pub struct AvailabilityEditor {
    state: ScheduleState,
    phase: EditorPhase,
    /// Typed-but-unconfirmed slots kept after a modal was cancelled.
    drafts: BTreeMap<DayKey, Vec<TimeSlot>>,
    last_external: Option<FormState>,
    outbox: PayloadOutbox,
}

impl AvailabilityEditor {
    /// Mount the editor on the parent's initial form. Does not emit.
    pub fn new(initial: &FormState) -> Self {
        Self {
            state: schedule_from_form(initial),
            phase: EditorPhase::Idle,
            drafts: BTreeMap::new(),
            last_external: Some(initial.clone()),
            outbox: PayloadOutbox::new(),
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn state(&self) -> &ScheduleState {
        &self.state
    }

    pub fn phase(&self) -> &EditorPhase {
        &self.phase
    }

    /// Field markers of the open modal, empty when none is open.
    pub fn modal_errors(&self) -> &[SlotFieldError] {
        self.phase.session().map(ModalSession::errors).unwrap_or_default()
    }

    /// Unconfirmed slots kept from a cancelled modal for `day`.
    pub fn pending_draft(&self, day: DayKey) -> Option<&[TimeSlot]> {
        self.drafts.get(&day).map(Vec::as_slice)
    }

    pub fn last_emitted(&self) -> Option<&AvailabilityPayload> {
        self.outbox.last()
    }

    /// Number of payloads pushed to the parent so far.
    pub fn emissions(&self) -> u64 {
        self.outbox.emissions()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<AvailabilityPayload>>> {
        self.outbox.subscribe()
    }

    /// The wizard's submit gate for this step.
    pub fn submit_check(&self) -> Result<(), Vec<DayIssue>> {
        validate_for_submit(&self.state)
    }

    // ── Guards ───────────────────────────────────────────────────────

    fn ensure_idle(&self) -> Result<(), CoreError> {
        match &self.phase {
            EditorPhase::Idle | EditorPhase::Reconciling => Ok(()),
            EditorPhase::ModalEditing(session) => Err(CoreError::ModalOpen { day: session.day }),
        }
    }

    fn session_mut(&mut self) -> Result<&mut ModalSession, CoreError> {
        match &mut self.phase {
            EditorPhase::ModalEditing(session) => Ok(session),
            EditorPhase::Idle | EditorPhase::Reconciling => Err(CoreError::NoModalOpen),
        }
    }

    // ── Day switches, mode, message ──────────────────────────────────

    /// Switch a day on or off.
    ///
    /// Turning a day on seeds one empty slot if it has none. Turning it off
    /// keeps its slots so switching back on restores them.
    pub fn toggle_day(&mut self, day: DayKey, enabled: bool) -> Result<(), CoreError> {
        self.ensure_idle()?;
        self.state.day_enabled.insert(day, enabled);
        if enabled {
            let slots = self.state.slots.entry(day).or_default();
            if slots.is_empty() {
                slots.push(TimeSlot::default());
            }
        }
        debug!(%day, enabled, "day toggled");
        self.publish();
        Ok(())
    }

    pub fn set_mode(&mut self, mode: ScheduleMode) -> Result<(), CoreError> {
        self.ensure_idle()?;
        self.state.mode = mode;
        self.publish();
        Ok(())
    }

    pub fn set_message(&mut self, message: impl Into<String>) -> Result<(), CoreError> {
        self.ensure_idle()?;
        self.state.message = message.into();
        self.publish();
        Ok(())
    }

    // ── Modal session ────────────────────────────────────────────────

    /// Open the slot editor for an enabled day.
    ///
    /// Resumes a draft left by a cancelled session if there is one.
    pub fn open_modal(&mut self, day: DayKey) -> Result<(), CoreError> {
        self.ensure_idle()?;
        if !self.state.is_enabled(day) {
            return Err(CoreError::DayDisabled { day });
        }
        let draft = self
            .drafts
            .remove(&day)
            .unwrap_or_else(|| self.state.slots_for(day).to_vec());
        debug!(%day, slots = draft.len(), "modal opened");
        self.phase = EditorPhase::ModalEditing(ModalSession::new(day, draft));
        Ok(())
    }

    pub fn add_slot(&mut self) -> Result<(), CoreError> {
        let session = self.session_mut()?;
        session.draft.push(TimeSlot::default());
        Ok(())
    }

    pub fn remove_slot(&mut self, index: usize) -> Result<(), CoreError> {
        let session = self.session_mut()?;
        let len = session.draft.len();
        if index >= len {
            return Err(CoreError::SlotOutOfRange { index, len });
        }
        session.draft.remove(index);
        // Indexes shifted; stale markers would point at the wrong rows.
        session.errors.clear();
        Ok(())
    }

    pub fn edit_slot(
        &mut self,
        index: usize,
        field: SlotField,
        value: impl Into<String>,
    ) -> Result<(), CoreError> {
        let session = self.session_mut()?;
        let len = session.draft.len();
        let Some(slot) = session.draft.get_mut(index) else {
            return Err(CoreError::SlotOutOfRange { index, len });
        };
        let value = value.into();
        match field {
            SlotField::Start => slot.start = value.into(),
            SlotField::End => slot.end = value.into(),
        }
        session.clear_field_errors(index, field);
        Ok(())
    }

    /// Validate and commit the open session.
    ///
    /// On rejection the modal stays open with its field markers set and the
    /// stored slots are untouched. On success the draft is stored sorted by
    /// start and, if asked, copied to every other enabled day. Returns the
    /// days that received the copy.
    pub fn confirm_modal(&mut self, copy_to_rest_of_week: bool) -> Result<Vec<DayKey>, CoreError> {
        let session = self.session_mut()?;
        let day = session.day;
        if let Err(errors) = validate_slots(&session.draft) {
            debug!(%day, problems = errors.len(), "modal confirm rejected");
            session.errors.clone_from(&errors);
            return Err(CoreError::SlotsRejected { day, errors });
        }
        let mut slots = std::mem::take(&mut session.draft);
        self.phase = EditorPhase::Idle;
        sort_by_start(&mut slots);

        let mut copied = Vec::new();
        if copy_to_rest_of_week {
            for other in DayKey::ALL {
                if other != day && self.state.is_enabled(other) {
                    self.state.slots.insert(other, slots.clone());
                    self.drafts.remove(&other);
                    copied.push(other);
                }
            }
        }
        self.state.slots.insert(day, slots);
        debug!(%day, copied = copied.len(), "modal confirmed");
        self.publish();
        Ok(copied)
    }

    /// Close the open session without committing.
    ///
    /// Validation markers are discarded; the typed slots are kept as the
    /// day's pending draft and come back when the modal is reopened.
    pub fn cancel_modal(&mut self) -> Result<(), CoreError> {
        match std::mem::take(&mut self.phase) {
            EditorPhase::ModalEditing(session) => {
                if session.draft.as_slice() != self.state.slots_for(session.day) {
                    self.drafts.insert(session.day, session.draft);
                }
                debug!(day = %session.day, "modal cancelled");
                self.publish();
                Ok(())
            }
            other => {
                self.phase = other;
                Err(CoreError::NoModalOpen)
            }
        }
    }

    // ── External updates ─────────────────────────────────────────────

    /// Reconcile the parent's current form with local state.
    ///
    /// Called on every parent re-render. Only a genuine external change
    /// (mode differs, or new slot data arrived) replaces local state, and
    /// never while a modal is open.
    pub fn receive(&mut self, form: &FormState) -> ExternalUpdate {
        if let Some(day) = self.phase.modal_day() {
            debug!(%day, "external update held off by open modal");
            return ExternalUpdate::Blocked { day };
        }
        if self.outbox.is_echo(form) {
            self.last_external = Some(form.clone());
            return ExternalUpdate::SelfEcho;
        }
        if self.last_external.as_ref() == Some(form) {
            return ExternalUpdate::Unchanged;
        }

        let incoming = schedule_from_form(form);
        let has_slots = incoming.slots.values().any(|s| !s.is_empty());
        self.last_external = Some(form.clone());
        if incoming.mode == self.state.mode && !has_slots {
            debug!("external form changed without schedule data, keeping local state");
            return ExternalUpdate::Unchanged;
        }

        self.phase = EditorPhase::Reconciling;
        debug!(mode = %incoming.mode, "applying external schedule");
        self.state = incoming;
        self.drafts.clear();
        self.phase = EditorPhase::Idle;
        self.publish();
        ExternalUpdate::Reset
    }

    // ── Emission ─────────────────────────────────────────────────────

    /// Derive the payload and push it if it differs from the last one.
    ///
    /// No-op unless idle. Returns the payload when one was sent.
    pub fn publish(&mut self) -> Option<&AvailabilityPayload> {
        if !self.phase.is_idle() {
            return None;
        }
        let payload = derive_payload(&self.state);
        if self.outbox.offer(payload) {
            self.outbox.last()
        } else {
            None
        }
    }
}
