//! Availability scheduling core for GoyaNova service listings.
//!
//! This crate owns the domain model, conversions, validation, and the
//! stateful editor behind the "availability" step of the listing wizard:
//!
//! - **Domain model** ([`model`]): [`ScheduleMode`], [`DayKey`],
//!   [`TimeSlot`], the nested [`ScheduleState`] the editor works on, and the
//!   flat [`FlatRecord`] rows the backend persists. Input is normalized
//!   leniently: Spanish or English day names, accents optional, mode
//!   synonyms collapsed.
//!
//! - **Conversions** ([`convert`]): [`to_nested`] groups persisted rows per
//!   day; [`to_flat`] expands complete days back into rows;
//!   [`schedule_from_form`] reads whatever the parent form holds.
//!
//! - **Validation** ([`validate`]): per-slot field errors for the modal,
//!   and the wizard's submit gate.
//!
//! - **[`AvailabilityEditor`]**: the state machine that mediates between
//!   the user and the parent form. Emits only structurally new payloads,
//!   ignores its own echoes, and defers external resets while a modal is
//!   open. Drive it directly or through [`EditorCommand`].

pub mod command;
pub mod convert;
pub mod editor;
pub mod error;
pub mod model;
pub mod validate;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::{CommandOutcome, EditorCommand};
pub use convert::{derive_payload, schedule_from_form, to_flat, to_nested};
pub use editor::{AvailabilityEditor, EditorPhase, ExternalUpdate, ModalSession};
pub use error::CoreError;
pub use validate::{
    DayIssue, DayStatus, SlotErrorKind, SlotField, SlotFieldError, day_status, validate_for_submit,
    validate_slots,
};

pub use model::{
    AvailabilityPayload, DayFlags, DayKey, DaySlots, FlatRecord, FormState, Locale, NestedSchedule,
    ScheduleMode, ScheduleState, SlotTime, TimeSlot,
};
