// ── Slot and schedule validation ──
//
// Two layers share one notion of "complete day":
//   - `validate_slots` runs when a day's modal is confirmed
//   - `validate_for_submit` runs before the wizard can be submitted
// `convert::to_flat` relies on `day_status` so a day it would drop is
// exactly a day the submit check flags.

use std::fmt;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::model::{DayKey, ScheduleState, SlotTime, TimeSlot};

/// Which input of a slot an error is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotField {
    Start,
    End,
}

impl SlotField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::End => "end",
        }
    }
}

impl fmt::Display for SlotField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SlotErrorKind {
    MissingStart,
    MissingEnd,
    InvalidTime,
    StartNotBeforeEnd,
    OverlapsPrevious,
}

/// A validation failure pinned to one field of one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotFieldError {
    pub slot: usize,
    pub field: SlotField,
    pub kind: SlotErrorKind,
}

impl SlotFieldError {
    /// Key used by the modal to place the inline marker, e.g. `"1.start"`.
    pub fn field_key(&self) -> String {
        format!("{}.{}", self.slot, self.field)
    }

    pub fn message(&self) -> &'static str {
        match self.kind {
            SlotErrorKind::MissingStart => "Start time is required",
            SlotErrorKind::MissingEnd => "End time is required",
            SlotErrorKind::InvalidTime => "Use the HH:MM format",
            SlotErrorKind::StartNotBeforeEnd => "End time must be after start time",
            SlotErrorKind::OverlapsPrevious => "Overlaps the previous slot",
        }
    }
}

impl fmt::Display for SlotFieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field_key(), self.message())
    }
}

fn check_field(
    slot: usize,
    field: SlotField,
    value: &SlotTime,
    errors: &mut Vec<SlotFieldError>,
) -> Option<NaiveTime> {
    let missing = match field {
        SlotField::Start => SlotErrorKind::MissingStart,
        SlotField::End => SlotErrorKind::MissingEnd,
    };
    if value.is_empty() {
        errors.push(SlotFieldError {
            slot,
            field,
            kind: missing,
        });
        return None;
    }
    let parsed = value.parse();
    if parsed.is_none() {
        errors.push(SlotFieldError {
            slot,
            field,
            kind: SlotErrorKind::InvalidTime,
        });
    }
    parsed
}

/// Validate one day's slots, in array order.
///
/// Every slot needs both ends, `start < end`, and must not start before
/// the previous slot ends. All problems are reported, not just the first.
pub fn validate_slots(slots: &[TimeSlot]) -> Result<(), Vec<SlotFieldError>> {
    let mut errors = Vec::new();
    let mut previous_end: Option<NaiveTime> = None;

    for (index, slot) in slots.iter().enumerate() {
        let start = check_field(index, SlotField::Start, &slot.start, &mut errors);
        let end = check_field(index, SlotField::End, &slot.end, &mut errors);

        if let (Some(start), Some(end)) = (start, end) {
            if start >= end {
                errors.push(SlotFieldError {
                    slot: index,
                    field: SlotField::End,
                    kind: SlotErrorKind::StartNotBeforeEnd,
                });
            }
        }
        if let (Some(prev), Some(start)) = (previous_end, start) {
            if prev > start {
                errors.push(SlotFieldError {
                    slot: index,
                    field: SlotField::Start,
                    kind: SlotErrorKind::OverlapsPrevious,
                });
            }
        }
        previous_end = end;
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

// ── Day completeness ─────────────────────────────────────────────────

/// Where a day sits in `Disabled -> Empty -> Incomplete -> Complete`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayStatus {
    Disabled,
    /// Enabled, no slots.
    Empty,
    /// Enabled, slots present but none has both ends.
    Incomplete,
    /// Enabled with at least one complete slot.
    Complete,
}

pub fn day_status(state: &ScheduleState, day: DayKey) -> DayStatus {
    if !state.is_enabled(day) {
        return DayStatus::Disabled;
    }
    let slots = state.slots_for(day);
    if slots.is_empty() {
        DayStatus::Empty
    } else if slots.iter().any(TimeSlot::is_complete) {
        DayStatus::Complete
    } else {
        DayStatus::Incomplete
    }
}

/// Why a schedule cannot be submitted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "issue", rename_all = "kebab-case")]
pub enum DayIssue {
    NoDaysEnabled,
    MissingSlots { day: DayKey },
}

impl fmt::Display for DayIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoDaysEnabled => f.write_str("enable at least one day"),
            Self::MissingSlots { day } => write!(f, "{day} needs at least one complete slot"),
        }
    }
}

/// The wizard's submit gate for the availability step.
///
/// Modes without a schedule always pass. Otherwise at least one day must be
/// enabled and every enabled day must be [`DayStatus::Complete`].
pub fn validate_for_submit(state: &ScheduleState) -> Result<(), Vec<DayIssue>> {
    if !state.mode.uses_slots() {
        return Ok(());
    }
    if state.enabled_days().next().is_none() {
        return Err(vec![DayIssue::NoDaysEnabled]);
    }
    let issues: Vec<DayIssue> = state
        .enabled_days()
        .filter(|day| day_status(state, *day) != DayStatus::Complete)
        .map(|day| DayIssue::MissingSlots { day })
        .collect();
    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}
