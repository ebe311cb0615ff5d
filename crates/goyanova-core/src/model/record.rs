// ── Persisted availability rows ──

use serde::{Deserialize, Deserializer, Serialize};

/// One row of the `disponibilidades` table: a single slot, or a single
/// marker row for modes without a schedule.
///
/// Fields stay as backend strings; interpretation happens in
/// [`crate::convert`]. Spanish column names are accepted on input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatRecord {
    #[serde(default, alias = "dia")]
    pub day: Option<String>,
    #[serde(default, alias = "horaInicio", alias = "hora_inicio")]
    pub start: Option<String>,
    #[serde(default, alias = "horaFin", alias = "hora_fin")]
    pub end: Option<String>,
    #[serde(default, alias = "turno", alias = "slot_index")]
    pub slot_index: Option<u32>,
    #[serde(default, alias = "etiqueta", deserialize_with = "null_as_empty")]
    pub label: String,
    #[serde(default, alias = "tipo", deserialize_with = "null_as_empty")]
    pub mode: String,
    #[serde(default, alias = "mensaje", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
