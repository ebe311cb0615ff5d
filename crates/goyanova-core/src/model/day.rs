// ── Day identifiers ──

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, de};
use strum::EnumString;

use super::text::fold_key;

/// Canonical, locale-invariant day of the week.
///
/// Ordering follows the Argentine week (Monday first), so `BTreeMap<DayKey, _>`
/// iterates days in display order. Serializes as the lowercase English name;
/// deserialization goes through [`DayKey::normalize`] and therefore accepts
/// Spanish names with or without accents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DayKey {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

/// Language used for display labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum Locale {
    #[default]
    Es,
    En,
}

impl DayKey {
    pub const ALL: [DayKey; 7] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
        Self::Sunday,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Monday => "monday",
            Self::Tuesday => "tuesday",
            Self::Wednesday => "wednesday",
            Self::Thursday => "thursday",
            Self::Friday => "friday",
            Self::Saturday => "saturday",
            Self::Sunday => "sunday",
        }
    }

    /// Tag written to persisted rows (`dia` column): Spanish, no accents.
    pub fn persisted_tag(self) -> &'static str {
        match self {
            Self::Monday => "lunes",
            Self::Tuesday => "martes",
            Self::Wednesday => "miercoles",
            Self::Thursday => "jueves",
            Self::Friday => "viernes",
            Self::Saturday => "sabado",
            Self::Sunday => "domingo",
        }
    }

    pub fn label(self, locale: Locale) -> &'static str {
        match (locale, self) {
            (Locale::Es, Self::Monday) => "Lunes",
            (Locale::Es, Self::Tuesday) => "Martes",
            (Locale::Es, Self::Wednesday) => "Miércoles",
            (Locale::Es, Self::Thursday) => "Jueves",
            (Locale::Es, Self::Friday) => "Viernes",
            (Locale::Es, Self::Saturday) => "Sábado",
            (Locale::Es, Self::Sunday) => "Domingo",
            (Locale::En, Self::Monday) => "Monday",
            (Locale::En, Self::Tuesday) => "Tuesday",
            (Locale::En, Self::Wednesday) => "Wednesday",
            (Locale::En, Self::Thursday) => "Thursday",
            (Locale::En, Self::Friday) => "Friday",
            (Locale::En, Self::Saturday) => "Saturday",
            (Locale::En, Self::Sunday) => "Sunday",
        }
    }

    /// Resolve a raw day string from any source.
    ///
    /// Case and diacritics are ignored; English and Spanish names are both
    /// recognized. Anything else yields `None` and is the caller's to drop.
    pub fn normalize(raw: &str) -> Option<Self> {
        let key = fold_key(raw);
        Self::ALL
            .into_iter()
            .find(|day| key == day.as_str() || key == day.persisted_tag())
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DayKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::normalize(s).ok_or_else(|| format!("unknown day '{s}'"))
    }
}

impl<'de> Deserialize<'de> for DayKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::normalize(&raw).ok_or_else(|| de::Error::custom(format!("unknown day '{raw}'")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn normalize_accepts_spanish_with_and_without_accents() {
        assert_eq!(DayKey::normalize("Miércoles"), Some(DayKey::Wednesday));
        assert_eq!(DayKey::normalize("miercoles"), Some(DayKey::Wednesday));
        assert_eq!(DayKey::normalize("SÁBADO"), Some(DayKey::Saturday));
    }

    #[test]
    fn normalize_accepts_english() {
        assert_eq!(DayKey::normalize("Sunday"), Some(DayKey::Sunday));
    }

    #[test]
    fn normalize_rejects_unknown() {
        assert_eq!(DayKey::normalize("feriado"), None);
        assert_eq!(DayKey::normalize(""), None);
    }

    #[test]
    fn ordering_starts_on_monday() {
        let mut days = vec![DayKey::Sunday, DayKey::Wednesday, DayKey::Monday];
        days.sort();
        assert_eq!(days, vec![DayKey::Monday, DayKey::Wednesday, DayKey::Sunday]);
    }

    #[test]
    fn labels_follow_locale() {
        assert_eq!(DayKey::Wednesday.label(Locale::Es), "Miércoles");
        assert_eq!(DayKey::Wednesday.label(Locale::En), "Wednesday");
    }

    #[test]
    fn deserialize_map_keys_in_spanish() {
        let map: std::collections::BTreeMap<DayKey, u8> =
            serde_json::from_str(r#"{"lunes": 1, "Sábado": 2}"#).unwrap();
        assert_eq!(map.get(&DayKey::Monday), Some(&1));
        assert_eq!(map.get(&DayKey::Saturday), Some(&2));
    }

    #[test]
    fn serialize_uses_english_identifier() {
        assert_eq!(
            serde_json::to_string(&DayKey::Thursday).unwrap(),
            "\"thursday\""
        );
    }

    #[test]
    fn locale_parses_case_insensitively() {
        assert_eq!("EN".parse::<Locale>().unwrap(), Locale::En);
    }
}
