// ── Wizard form boundary ──
//
// Shapes exchanged with the parent form-state owner. Inbound fields are all
// optional because the parent may hold a fresh form (nested shape) or a
// listing loaded for edit (flat shape).

use serde::{Deserialize, Serialize};

use super::mode::ScheduleMode;
use super::record::FlatRecord;
use super::schedule::{DayFlags, DaySlots, lenient_flags, lenient_slots};

/// Availability slice of the parent form, as handed to the editor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tipo_disponibilidad: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mensaje: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_slots",
        skip_serializing_if = "Option::is_none"
    )]
    pub horarios: Option<DaySlots>,
    #[serde(
        default,
        deserialize_with = "lenient_flags",
        skip_serializing_if = "Option::is_none"
    )]
    pub dias_activos: Option<DayFlags>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disponibilidades: Option<Vec<FlatRecord>>,
}

/// What the editor pushes to the parent's state setter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityPayload {
    pub tipo_disponibilidad: ScheduleMode,
    pub mensaje: String,
    pub horarios: DaySlots,
    pub dias_activos: DayFlags,
    pub disponibilidades: Vec<FlatRecord>,
}

impl From<&AvailabilityPayload> for FormState {
    /// The form the parent holds right after applying `payload`.
    fn from(payload: &AvailabilityPayload) -> Self {
        Self {
            tipo_disponibilidad: Some(payload.tipo_disponibilidad.tag().to_owned()),
            mensaje: Some(payload.mensaje.clone()),
            horarios: Some(payload.horarios.clone()),
            dias_activos: Some(payload.dias_activos.clone()),
            disponibilidades: Some(payload.disponibilidades.clone()),
        }
    }
}

impl From<AvailabilityPayload> for FormState {
    fn from(payload: AvailabilityPayload) -> Self {
        Self {
            tipo_disponibilidad: Some(payload.tipo_disponibilidad.tag().to_owned()),
            mensaje: Some(payload.mensaje),
            horarios: Some(payload.horarios),
            dias_activos: Some(payload.dias_activos),
            disponibilidades: Some(payload.disponibilidades),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{DayKey, TimeSlot};

    #[test]
    fn payload_converts_to_fully_populated_form() {
        let mut horarios = DaySlots::new();
        horarios.insert(DayKey::Monday, vec![TimeSlot::new("09:00", "12:00")]);
        let payload = AvailabilityPayload {
            tipo_disponibilidad: ScheduleMode::Shifts,
            mensaje: "Llamar antes".into(),
            horarios,
            ..AvailabilityPayload::default()
        };

        let by_ref = FormState::from(&payload);
        assert_eq!(by_ref.tipo_disponibilidad.as_deref(), Some("turnos"));
        assert_eq!(by_ref, FormState::from(payload));
    }

    #[test]
    fn form_deserializes_camel_case() {
        let form: FormState = serde_json::from_str(
            r#"{"tipoDisponibilidad":"turnos","horarios":{"martes":[{"start":"10:00","end":"11:00"}]}}"#,
        )
        .unwrap();
        assert_eq!(form.tipo_disponibilidad.as_deref(), Some("turnos"));
        assert_eq!(form.horarios.unwrap()[&DayKey::Tuesday].len(), 1);
        assert!(form.disponibilidades.is_none());
    }

    #[test]
    fn unknown_day_keys_are_dropped() {
        let form: FormState = serde_json::from_str(
            r#"{
                "horarios": {
                    "feriado": [{"start": "10:00", "end": "11:00"}],
                    "Miércoles": [{"start": "09:00", "end": "10:00"}],
                    "jueves": null
                },
                "diasActivos": {"feriado": true, "miercoles": true, "viernes": null}
            }"#,
        )
        .unwrap();

        let horarios = form.horarios.unwrap();
        assert_eq!(
            horarios.keys().copied().collect::<Vec<_>>(),
            vec![DayKey::Wednesday, DayKey::Thursday]
        );
        assert!(horarios[&DayKey::Thursday].is_empty());

        let flags = form.dias_activos.unwrap();
        assert_eq!(flags.get(&DayKey::Wednesday), Some(&true));
        assert_eq!(flags.get(&DayKey::Friday), Some(&false));
        assert_eq!(flags.len(), 2);
    }

    #[test]
    fn null_times_read_as_empty() {
        let form: FormState = serde_json::from_str(
            r#"{"horarios": {"lunes": [{"start": null, "end": "12:00"}]}}"#,
        )
        .unwrap();
        let slot = &form.horarios.unwrap()[&DayKey::Monday][0];
        assert!(slot.start.is_empty());
        assert_eq!(slot.end.as_str(), "12:00");
        assert!(!slot.is_complete());
    }
}
