// ── Schedule state ──

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use super::day::DayKey;
use super::mode::ScheduleMode;
use super::slot::TimeSlot;

/// Per-day slot lists keyed by canonical day.
pub type DaySlots = BTreeMap<DayKey, Vec<TimeSlot>>;

/// Per-day switch state.
pub type DayFlags = BTreeMap<DayKey, bool>;

// ── Lenient day maps ───────────────────────────────────────────────
// Inbound forms are hand-edited or produced by older clients. Day keys go
// through `DayKey::normalize`; keys that do not resolve are dropped and
// null values read as empty.

pub(crate) fn lenient_slots<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<DaySlots>, D::Error> {
    let Some(raw) = Option::<BTreeMap<String, Option<Vec<TimeSlot>>>>::deserialize(deserializer)?
    else {
        return Ok(None);
    };
    let mut slots = DaySlots::new();
    for (key, list) in raw {
        match DayKey::normalize(&key) {
            Some(day) => slots
                .entry(day)
                .or_default()
                .extend(list.unwrap_or_default()),
            None => debug!(day = %key, "dropping slots for unknown day"),
        }
    }
    Ok(Some(slots))
}

pub(crate) fn lenient_flags<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<DayFlags>, D::Error> {
    let Some(raw) = Option::<BTreeMap<String, Option<bool>>>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let mut flags = DayFlags::new();
    for (key, on) in raw {
        match DayKey::normalize(&key) {
            Some(day) => *flags.entry(day).or_default() |= on.unwrap_or(false),
            None => debug!(day = %key, "dropping flag for unknown day"),
        }
    }
    Ok(Some(flags))
}

/// Editor-owned schedule.
///
/// Slots of a disabled day are kept: switching a day off and on again
/// restores what was there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleState {
    #[serde(default)]
    pub mode: ScheduleMode,
    #[serde(default)]
    pub message: String,
    #[serde(default = "all_days_off")]
    pub day_enabled: DayFlags,
    #[serde(default)]
    pub slots: DaySlots,
}

fn all_days_off() -> DayFlags {
    DayKey::ALL.into_iter().map(|day| (day, false)).collect()
}

impl Default for ScheduleState {
    fn default() -> Self {
        Self {
            mode: ScheduleMode::default(),
            message: String::new(),
            day_enabled: all_days_off(),
            slots: BTreeMap::new(),
        }
    }
}

impl ScheduleState {
    pub fn is_enabled(&self, day: DayKey) -> bool {
        self.day_enabled.get(&day).copied().unwrap_or(false)
    }

    pub fn slots_for(&self, day: DayKey) -> &[TimeSlot] {
        self.slots.get(&day).map_or(&[], Vec::as_slice)
    }

    pub fn enabled_days(&self) -> impl Iterator<Item = DayKey> + '_ {
        DayKey::ALL.into_iter().filter(|day| self.is_enabled(*day))
    }

    /// Flags for all seven days, missing entries read as off.
    pub fn flags(&self) -> DayFlags {
        DayKey::ALL
            .into_iter()
            .map(|day| (day, self.is_enabled(day)))
            .collect()
    }
}

/// Output of [`crate::convert::to_nested`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NestedSchedule {
    pub mode: ScheduleMode,
    pub message: String,
    pub slots: DaySlots,
}

impl From<NestedSchedule> for ScheduleState {
    /// Days that have slots start enabled.
    fn from(nested: NestedSchedule) -> Self {
        let day_enabled = DayKey::ALL
            .into_iter()
            .map(|day| (day, nested.slots.get(&day).is_some_and(|s| !s.is_empty())))
            .collect();
        Self {
            mode: nested.mode,
            message: nested.message,
            day_enabled,
            slots: nested.slots,
        }
    }
}
