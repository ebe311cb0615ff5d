// ── Time slots ──

use std::fmt;

use chrono::NaiveTime;
use serde::{Deserialize, Deserializer, Serialize};

/// A time of day exactly as the provider typed it.
///
/// Kept as text because the editor must hold half-typed values. An empty
/// value means "incomplete", never an error; `null` reads as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SlotTime(String);

impl SlotTime {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Parse as `HH:MM:SS` or `HH:MM`.
    pub fn parse(&self) -> Option<NaiveTime> {
        let raw = self.0.trim();
        NaiveTime::parse_from_str(raw, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
            .ok()
    }

    /// Persistence form: `HH:MM:SS`, `None` when empty.
    ///
    /// Text that does not parse is passed through trimmed; the modal
    /// validator is what keeps such values out of confirmed slots.
    pub fn persisted(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        Some(self.parse().map_or_else(
            || self.0.trim().to_owned(),
            |t| t.format("%H:%M:%S").to_string(),
        ))
    }
}

impl<'de> Deserialize<'de> for SlotTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self(Option::<String>::deserialize(deserializer)?.unwrap_or_default()))
    }
}

impl fmt::Display for SlotTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SlotTime {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for SlotTime {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

/// One contiguous working interval within a day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    #[serde(default, alias = "inicio", alias = "horaInicio")]
    pub start: SlotTime,
    #[serde(default, alias = "fin", alias = "horaFin")]
    pub end: SlotTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot_index: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl TimeSlot {
    pub fn new(start: impl Into<SlotTime>, end: impl Into<SlotTime>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            slot_index: None,
            label: None,
        }
    }

    /// Both ends filled in. Says nothing about ordering or overlap.
    pub fn is_complete(&self) -> bool {
        !self.start.is_empty() && !self.end.is_empty()
    }
}
