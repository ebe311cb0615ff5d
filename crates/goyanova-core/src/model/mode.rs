// ── Schedule mode ──
//
// The persisted `tipo` column has accumulated synonyms over time
// ("horarios", "horario", "Fixed hours"...). They are resolved here, once,
// and everything past this point matches on the enum.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum::EnumIter;
use tracing::debug;

use super::text::fold_tag;

/// How a provider describes their availability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, EnumIter)]
pub enum ScheduleMode {
    /// Regular opening hours per day.
    #[default]
    FixedHours,
    /// Numbered shifts per day, plus an optional note.
    Shifts,
    /// Time windows in which requests are taken, plus an optional note.
    ByRequest,
    /// No schedule; the provider agrees times when contacted.
    AskOnContact,
    /// Not taking work at the moment.
    Unavailable,
}

impl ScheduleMode {
    /// Tag written to the persisted `tipo` column.
    pub fn tag(self) -> &'static str {
        match self {
            Self::FixedHours => "horarios",
            Self::Shifts => "turnos",
            Self::ByRequest => "a_pedido",
            Self::AskOnContact => "consultar",
            Self::Unavailable => "no_disponible",
        }
    }

    /// Fixed label written alongside every persisted row.
    pub fn label(self) -> &'static str {
        match self {
            Self::FixedHours => "Fixed schedule",
            Self::Shifts => "Works by shift",
            Self::ByRequest => "Available on request",
            Self::AskOnContact => "Ask when contacting",
            Self::Unavailable => "Not available",
        }
    }

    /// Whether per-day slots carry meaning in this mode.
    pub fn uses_slots(self) -> bool {
        matches!(self, Self::FixedHours | Self::Shifts | Self::ByRequest)
    }

    /// Whether the free-text message is persisted in this mode.
    pub fn uses_message(self) -> bool {
        matches!(self, Self::Shifts | Self::ByRequest)
    }

    /// Strict lookup of a tag or known synonym.
    pub fn parse_tag(raw: &str) -> Option<Self> {
        match fold_tag(raw).as_str() {
            "horarios" | "horario" | "horario_fijo" | "fixed_hours" | "fixedhours" | "fixed" => {
                Some(Self::FixedHours)
            }
            "turnos" | "turno" | "por_turnos" | "shifts" | "shift" => Some(Self::Shifts),
            "a_pedido" | "por_pedido" | "bajo_pedido" | "pedido" | "by_request" | "byrequest"
            | "on_request" => Some(Self::ByRequest),
            "consultar" | "a_consultar" | "consultar_al_contactar" | "ask_on_contact"
            | "askoncontact" => Some(Self::AskOnContact),
            "no_disponible" | "nodisponible" | "unavailable" => Some(Self::Unavailable),
            _ => None,
        }
    }

    /// Lenient lookup: empty or unknown input degrades to [`FixedHours`].
    ///
    /// [`FixedHours`]: ScheduleMode::FixedHours
    pub fn normalize(raw: &str) -> Self {
        if raw.trim().is_empty() {
            return Self::default();
        }
        Self::parse_tag(raw).unwrap_or_else(|| {
            debug!(raw, "unknown schedule mode, using fixed hours");
            Self::default()
        })
    }
}

impl fmt::Display for ScheduleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl Serialize for ScheduleMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.tag())
    }
}

impl<'de> Deserialize<'de> for ScheduleMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map_or_else(Self::default, Self::normalize))
    }
}
