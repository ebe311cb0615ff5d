// ── Flat <-> nested schedule conversions ──
//
// Bridges persisted `FlatRecord` rows and the nested per-day model the
// editor works on. Pure functions: malformed rows are normalized or
// dropped, never reported as errors.

use tracing::debug;

use crate::model::{
    AvailabilityPayload, DayKey, DaySlots, FlatRecord, FormState, NestedSchedule, ScheduleMode,
    ScheduleState, SlotTime, TimeSlot,
};
use crate::validate::{DayStatus, day_status};

// ── Helpers ────────────────────────────────────────────────────────

/// Sort slots by start time. Stable; blank or unparsable starts go last.
pub(crate) fn sort_by_start(slots: &mut [TimeSlot]) {
    slots.sort_by_key(|slot| {
        let start = slot.start.parse();
        (start.is_none(), start)
    });
}

fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

fn record_to_slot(record: &FlatRecord) -> TimeSlot {
    TimeSlot {
        start: SlotTime::new(record.start.clone().unwrap_or_default()),
        end: SlotTime::new(record.end.clone().unwrap_or_default()),
        slot_index: record.slot_index,
        label: non_empty(Some(record.label.as_str())).map(str::to_owned),
    }
}

// ── Flat -> nested ─────────────────────────────────────────────────

/// Group persisted rows into per-day slot lists.
///
/// - mode comes from the first row, defaulting to fixed hours
/// - the first non-empty message in input order wins
/// - rows whose day does not resolve (including marker rows) are dropped
pub fn to_nested(records: &[FlatRecord]) -> NestedSchedule {
    let mode = records
        .first()
        .map_or_else(ScheduleMode::default, |r| ScheduleMode::normalize(&r.mode));

    let message = records
        .iter()
        .find_map(|r| non_empty(r.message.as_deref()))
        .unwrap_or_default()
        .to_owned();

    let mut slots = DaySlots::new();
    for record in records {
        let Some(raw_day) = record.day.as_deref() else {
            continue;
        };
        let Some(day) = DayKey::normalize(raw_day) else {
            debug!(day = raw_day, "dropping availability row with unknown day");
            continue;
        };
        slots.entry(day).or_default().push(record_to_slot(record));
    }
    for day_slots in slots.values_mut() {
        sort_by_start(day_slots);
    }

    NestedSchedule {
        mode,
        message,
        slots,
    }
}

// ── Nested -> flat ─────────────────────────────────────────────────

/// Flatten a schedule into persistence rows.
///
/// Only days whose status is [`DayStatus::Complete`] contribute, and only
/// their complete slots. Modes without a schedule produce a single marker
/// row with no day or times.
pub fn to_flat(state: &ScheduleState) -> Vec<FlatRecord> {
    let mode = state.mode;
    if !mode.uses_slots() {
        return vec![FlatRecord {
            label: mode.label().to_owned(),
            mode: mode.tag().to_owned(),
            ..FlatRecord::default()
        }];
    }

    let message = if mode.uses_message() {
        non_empty(Some(state.message.as_str())).map(str::to_owned)
    } else {
        None
    };

    let mut records = Vec::new();
    for day in DayKey::ALL
        .into_iter()
        .filter(|day| day_status(state, *day) == DayStatus::Complete)
    {
        // Shift numbers follow array position, gaps included.
        let complete = state
            .slots_for(day)
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_complete());
        for (position, slot) in complete {
            let slot_index = (mode == ScheduleMode::Shifts)
                .then(|| u32::try_from(position + 1).unwrap_or(u32::MAX));
            records.push(FlatRecord {
                day: Some(day.persisted_tag().to_owned()),
                start: slot.start.persisted(),
                end: slot.end.persisted(),
                slot_index,
                label: mode.label().to_owned(),
                mode: mode.tag().to_owned(),
                message: message.clone(),
            });
        }
    }
    records
}

// ── Form boundary ──────────────────────────────────────────────────

/// Interpret whatever the parent form holds as a full schedule state.
///
/// Non-empty `horarios` wins over `disponibilidades`; a non-blank
/// `tipoDisponibilidad` or `mensaje` wins over what the rows carry.
/// `diasActivos` only describes the nested shape: when the slots come from
/// the rows, the days that have slots are the enabled ones.
pub fn schedule_from_form(form: &FormState) -> ScheduleState {
    let nested = form
        .disponibilidades
        .as_deref()
        .map(to_nested)
        .unwrap_or_default();

    let mode = non_empty(form.tipo_disponibilidad.as_deref())
        .map_or(nested.mode, ScheduleMode::normalize);

    let message = non_empty(form.mensaje.as_deref())
        .map_or(nested.message, str::to_owned);

    let (slots, from_rows) = match &form.horarios {
        Some(horarios) if horarios.values().any(|s| !s.is_empty()) => (horarios.clone(), false),
        _ => {
            let from_rows = !nested.slots.is_empty();
            (nested.slots, from_rows)
        }
    };

    let mut state = ScheduleState::from(NestedSchedule {
        mode,
        message,
        slots,
    });
    match &form.dias_activos {
        Some(flags) if !from_rows => {
            for day in DayKey::ALL {
                state
                    .day_enabled
                    .insert(day, flags.get(&day).copied().unwrap_or(false));
            }
        }
        Some(_) => debug!("slots came from rows, ignoring stale day flags"),
        None => {}
    }
    state
}

/// Build the payload the editor hands to the parent.
pub fn derive_payload(state: &ScheduleState) -> AvailabilityPayload {
    AvailabilityPayload {
        tipo_disponibilidad: state.mode,
        mensaje: state.message.clone(),
        horarios: state.slots.clone(),
        dias_activos: state.flags(),
        disponibilidades: to_flat(state),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(day: &str, start: &str, end: &str, mode: &str) -> FlatRecord {
        FlatRecord {
            day: Some(day.into()),
            start: Some(start.into()),
            end: Some(end.into()),
            mode: mode.into(),
            ..FlatRecord::default()
        }
    }

    fn enabled(day: DayKey, slots: Vec<TimeSlot>, mode: ScheduleMode) -> ScheduleState {
        let mut state = ScheduleState {
            mode,
            ..ScheduleState::default()
        };
        state.day_enabled.insert(day, true);
        state.slots.insert(day, slots);
        state
    }

    // ── to_nested ──

    #[test]
    fn empty_input_yields_default_schedule() {
        assert_eq!(to_nested(&[]), NestedSchedule::default());
    }

    #[test]
    fn accented_and_plain_day_names_share_a_bucket() {
        let nested = to_nested(&[
            row("Miércoles", "09:00:00", "12:00:00", "horarios"),
            row("miercoles", "14:00:00", "18:00:00", "horarios"),
        ]);
        assert_eq!(nested.slots.len(), 1);
        assert_eq!(nested.slots[&DayKey::Wednesday].len(), 2);
    }

    #[test]
    fn unknown_days_are_dropped() {
        let nested = to_nested(&[
            row("feriado", "09:00", "12:00", "horarios"),
            row("lunes", "09:00", "12:00", "horarios"),
        ]);
        assert_eq!(nested.slots.keys().copied().collect::<Vec<_>>(), vec![DayKey::Monday]);
    }

    #[test]
    fn mode_comes_from_first_row() {
        let nested = to_nested(&[
            row("lunes", "09:00", "12:00", "turnos"),
            row("martes", "09:00", "12:00", "horarios"),
        ]);
        assert_eq!(nested.mode, ScheduleMode::Shifts);
    }

    #[test]
    fn missing_mode_defaults_to_fixed_hours() {
        let nested = to_nested(&[row("lunes", "09:00", "12:00", "")]);
        assert_eq!(nested.mode, ScheduleMode::FixedHours);
    }

    #[test]
    fn first_non_empty_message_wins() {
        let mut a = row("lunes", "09:00", "12:00", "turnos");
        a.message = Some("   ".into());
        let mut b = row("martes", "09:00", "12:00", "turnos");
        b.message = Some("Solo por la tarde".into());
        let mut c = row("jueves", "09:00", "12:00", "turnos");
        c.message = Some("Otro".into());
        assert_eq!(to_nested(&[a, b, c]).message, "Solo por la tarde");
    }

    #[test]
    fn missing_times_become_empty_slots() {
        let record = FlatRecord {
            day: Some("viernes".into()),
            ..FlatRecord::default()
        };
        let nested = to_nested(&[record]);
        let slot = &nested.slots[&DayKey::Friday][0];
        assert!(slot.start.is_empty());
        assert!(slot.end.is_empty());
        assert!(!slot.is_complete());
    }

    #[test]
    fn slots_are_sorted_by_start() {
        let nested = to_nested(&[
            row("lunes", "14:00:00", "18:00:00", "horarios"),
            row("lunes", "", "", "horarios"),
            row("lunes", "08:00:00", "12:00:00", "horarios"),
        ]);
        let starts: Vec<&str> = nested.slots[&DayKey::Monday]
            .iter()
            .map(|s| s.start.as_str())
            .collect();
        assert_eq!(starts, vec!["08:00:00", "14:00:00", ""]);
    }

    #[test]
    fn marker_row_yields_mode_without_slots() {
        let marker = FlatRecord {
            mode: "consultar".into(),
            label: "Ask when contacting".into(),
            ..FlatRecord::default()
        };
        let nested = to_nested(&[marker]);
        assert_eq!(nested.mode, ScheduleMode::AskOnContact);
        assert!(nested.slots.is_empty());
    }

    // ── to_flat ──

    #[test]
    fn fixed_hours_rows_have_seconds_and_no_message() {
        let mut state = enabled(
            DayKey::Monday,
            vec![TimeSlot::new("09:00", "13:00")],
            ScheduleMode::FixedHours,
        );
        state.message = "ignored".into();
        assert_eq!(
            to_flat(&state),
            vec![FlatRecord {
                day: Some("lunes".into()),
                start: Some("09:00:00".into()),
                end: Some("13:00:00".into()),
                slot_index: None,
                label: "Fixed schedule".into(),
                mode: "horarios".into(),
                message: None,
            }]
        );
    }

    #[test]
    fn shifts_get_one_based_indexes_and_trimmed_message() {
        let mut state = enabled(
            DayKey::Saturday,
            vec![TimeSlot::new("08:00", "12:00"), TimeSlot::new("16:00", "20:00")],
            ScheduleMode::Shifts,
        );
        state.message = "  Turno noche a convenir ".into();
        let records = to_flat(&state);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].slot_index, Some(1));
        assert_eq!(records[1].slot_index, Some(2));
        assert_eq!(records[0].label, "Works by shift");
        assert_eq!(records[1].message.as_deref(), Some("Turno noche a convenir"));
    }

    #[test]
    fn blank_message_serializes_as_absent() {
        let mut state = enabled(
            DayKey::Monday,
            vec![TimeSlot::new("09:00", "10:00")],
            ScheduleMode::ByRequest,
        );
        state.message = "   ".into();
        let records = to_flat(&state);
        assert_eq!(records[0].message, None);
        assert_eq!(records[0].label, "Available on request");
    }

    #[test]
    fn unscheduled_modes_emit_single_marker_row() {
        for mode in [ScheduleMode::AskOnContact, ScheduleMode::Unavailable] {
            let mut state = enabled(DayKey::Monday, vec![TimeSlot::new("09:00", "10:00")], mode);
            state.message = "hola".into();
            let records = to_flat(&state);
            assert_eq!(records.len(), 1);
            let marker = &records[0];
            assert_eq!(marker.day, None);
            assert_eq!(marker.start, None);
            assert_eq!(marker.end, None);
            assert_eq!(marker.message, None);
            assert_eq!(marker.label, mode.label());
            assert_eq!(marker.mode, mode.tag());
        }
    }

    #[test]
    fn disabled_and_incomplete_days_contribute_nothing() {
        let mut state = enabled(
            DayKey::Tuesday,
            vec![TimeSlot::new("09:00", "")],
            ScheduleMode::FixedHours,
        );
        state
            .slots
            .insert(DayKey::Wednesday, vec![TimeSlot::new("09:00", "10:00")]);
        assert!(to_flat(&state).is_empty());
    }

    #[test]
    fn incomplete_slots_of_a_complete_day_are_skipped() {
        let state = enabled(
            DayKey::Friday,
            vec![TimeSlot::new("09:00", "10:00"), TimeSlot::new("", "12:00")],
            ScheduleMode::Shifts,
        );
        let records = to_flat(&state);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].slot_index, Some(1));
    }

    #[test]
    fn rows_follow_week_order() {
        let mut state = enabled(
            DayKey::Sunday,
            vec![TimeSlot::new("10:00", "12:00")],
            ScheduleMode::FixedHours,
        );
        state.day_enabled.insert(DayKey::Monday, true);
        state
            .slots
            .insert(DayKey::Monday, vec![TimeSlot::new("10:00", "12:00")]);
        let days: Vec<_> = to_flat(&state).into_iter().map(|r| r.day.unwrap()).collect();
        assert_eq!(days, vec!["lunes", "domingo"]);
    }

    #[test]
    fn shift_numbers_count_incomplete_slots_ahead() {
        let state = enabled(
            DayKey::Monday,
            vec![TimeSlot::new("", "09:00"), TimeSlot::new("10:00", "12:00")],
            ScheduleMode::Shifts,
        );
        let records = to_flat(&state);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].slot_index, Some(2));
    }

    // ── round trip ──

    #[test]
    fn round_trip_preserves_days_and_times() {
        for mode in [ScheduleMode::FixedHours, ScheduleMode::Shifts, ScheduleMode::ByRequest] {
            let mut state = enabled(
                DayKey::Monday,
                vec![TimeSlot::new("09:00", "12:00"), TimeSlot::new("15:30", "19:00")],
                mode,
            );
            state.day_enabled.insert(DayKey::Thursday, true);
            state
                .slots
                .insert(DayKey::Thursday, vec![TimeSlot::new("10:00:00", "11:00:00")]);

            let back = ScheduleState::from(to_nested(&to_flat(&state)));
            assert_eq!(back.mode, mode);
            assert_eq!(
                back.enabled_days().collect::<Vec<_>>(),
                state.enabled_days().collect::<Vec<_>>()
            );
            for day in state.enabled_days() {
                let times = |slots: &[TimeSlot]| -> Vec<_> {
                    slots.iter().map(|s| (s.start.parse(), s.end.parse())).collect()
                };
                assert_eq!(times(back.slots_for(day)), times(state.slots_for(day)));
            }
        }
    }

    // ── form boundary ──

    #[test]
    fn form_prefers_nested_shape_when_populated() {
        let mut horarios = DaySlots::new();
        horarios.insert(DayKey::Tuesday, vec![TimeSlot::new("10:00", "11:00")]);
        let form = FormState {
            horarios: Some(horarios),
            disponibilidades: Some(vec![row("lunes", "09:00", "12:00", "turnos")]),
            ..FormState::default()
        };
        let state = schedule_from_form(&form);
        assert_eq!(state.mode, ScheduleMode::Shifts);
        assert!(state.is_enabled(DayKey::Tuesday));
        assert!(!state.is_enabled(DayKey::Monday));
    }

    #[test]
    fn form_falls_back_to_flat_rows() {
        let form = FormState {
            tipo_disponibilidad: Some("a_pedido".into()),
            horarios: Some(DaySlots::new()),
            disponibilidades: Some(vec![row("lunes", "09:00", "12:00", "turnos")]),
            ..FormState::default()
        };
        let state = schedule_from_form(&form);
        assert_eq!(state.mode, ScheduleMode::ByRequest);
        assert!(state.is_enabled(DayKey::Monday));
    }

    #[test]
    fn explicit_flags_keep_disabled_days_with_slots() {
        let mut horarios = DaySlots::new();
        horarios.insert(DayKey::Tuesday, vec![TimeSlot::new("10:00", "11:00")]);
        let mut flags = crate::model::DayFlags::new();
        flags.insert(DayKey::Tuesday, false);
        let form = FormState {
            horarios: Some(horarios),
            dias_activos: Some(flags),
            ..FormState::default()
        };
        let state = schedule_from_form(&form);
        assert!(!state.is_enabled(DayKey::Tuesday));
        assert_eq!(state.slots_for(DayKey::Tuesday).len(), 1);
    }

    /// A form that already holds one editor emission, with a loaded listing
    /// merged in on top of it.
    fn listing_over_stale_emission() -> FormState {
        let mut loaded = row("martes", "10:00", "14:00", "turnos");
        loaded.message = Some("Traer materiales".into());
        FormState {
            tipo_disponibilidad: Some("turnos".into()),
            mensaje: Some(String::new()),
            horarios: Some(DaySlots::new()),
            dias_activos: Some(DayKey::ALL.into_iter().map(|d| (d, false)).collect()),
            disponibilidades: Some(vec![loaded]),
        }
    }

    #[test]
    fn rows_enable_their_days_over_stale_flags() {
        let state = schedule_from_form(&listing_over_stale_emission());
        assert_eq!(state.mode, ScheduleMode::Shifts);
        assert_eq!(state.enabled_days().collect::<Vec<_>>(), vec![DayKey::Tuesday]);
        assert_eq!(state.message, "Traer materiales");

        let records = to_flat(&state);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].day.as_deref(), Some("martes"));
        assert_eq!(records[0].start.as_deref(), Some("10:00:00"));
        assert_eq!(records[0].message.as_deref(), Some("Traer materiales"));
    }

    #[test]
    fn blank_message_falls_back_to_rows() {
        let mut form = listing_over_stale_emission();
        form.mensaje = Some("   ".into());
        assert_eq!(schedule_from_form(&form).message, "Traer materiales");

        form.mensaje = Some("Solo mañanas".into());
        assert_eq!(schedule_from_form(&form).message, "Solo mañanas");
    }

    #[test]
    fn flags_apply_when_no_shape_has_slots() {
        let mut flags = crate::model::DayFlags::new();
        flags.insert(DayKey::Monday, true);
        let form = FormState {
            horarios: Some(DaySlots::new()),
            dias_activos: Some(flags),
            disponibilidades: Some(Vec::new()),
            ..FormState::default()
        };
        assert_eq!(
            schedule_from_form(&form).enabled_days().collect::<Vec<_>>(),
            vec![DayKey::Monday]
        );
    }

    #[test]
    fn malformed_form_degrades_to_default() {
        assert_eq!(schedule_from_form(&FormState::default()), ScheduleState::default());
    }

    #[test]
    fn derived_payload_matches_state() {
        let state = enabled(
            DayKey::Monday,
            vec![TimeSlot::new("09:00", "13:00")],
            ScheduleMode::FixedHours,
        );
        let payload = derive_payload(&state);
        assert_eq!(payload.tipo_disponibilidad, ScheduleMode::FixedHours);
        assert_eq!(payload.dias_activos.len(), 7);
        assert_eq!(payload.disponibilidades, to_flat(&state));
        assert_eq!(schedule_from_form(&FormState::from(&payload)), state);
    }
}
