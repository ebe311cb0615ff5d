// ── Availability domain model ──
//
// Canonical types for a provider's working schedule: the nested per-day
// form the editor works on, the flat rows the backend persists, and the
// form-boundary shapes exchanged with the wizard.

mod text;

pub mod day;
pub mod form;
pub mod mode;
pub mod record;
pub mod schedule;
pub mod slot;

// ── Re-exports ──────────────────────────────────────────────────────
// Flat access: `use goyanova_core::model::*` gives you everything.

pub use day::{DayKey, Locale};
pub use form::{AvailabilityPayload, FormState};
pub use mode::ScheduleMode;
pub use record::FlatRecord;
pub use schedule::{DayFlags, DaySlots, NestedSchedule, ScheduleState};
pub use slot::{SlotTime, TimeSlot};
