//! Schedule command handlers: convert and check documents.

use std::fmt::Write as _;

use serde::Serialize;
use tabled::Tabled;
use tracing::info;

use goyanova_core::{
    DayIssue, DayKey, DayStatus, FlatRecord, FormState, Locale, NestedSchedule, ScheduleMode,
    ScheduleState, SlotFieldError, TimeSlot, day_status, schedule_from_form, to_flat, to_nested,
    validate_for_submit, validate_slots,
};

use crate::cli::{ScheduleArgs, ScheduleCommand};
use crate::config::Settings;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct SlotRow {
    #[tabled(rename = "Day")]
    day: String,
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Start")]
    start: String,
    #[tabled(rename = "End")]
    end: String,
}

#[derive(Tabled)]
struct RecordRow {
    #[tabled(rename = "Day")]
    day: String,
    #[tabled(rename = "Start")]
    start: String,
    #[tabled(rename = "End")]
    end: String,
    #[tabled(rename = "Shift")]
    shift: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Message")]
    message: String,
}

impl From<&FlatRecord> for RecordRow {
    fn from(r: &FlatRecord) -> Self {
        Self {
            day: r.day.clone().unwrap_or_else(|| "-".into()),
            start: r.start.clone().unwrap_or_default(),
            end: r.end.clone().unwrap_or_default(),
            shift: r.slot_index.map(|i| i.to_string()).unwrap_or_default(),
            label: r.label.clone(),
            message: r.message.clone().unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct DayRow {
    #[tabled(rename = "Day")]
    day: String,
    #[tabled(rename = "Slots")]
    slots: usize,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Problems")]
    problems: String,
}

// ── Check report ────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct DayReport {
    day: DayKey,
    status: DayStatus,
    slots: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<SlotFieldError>,
}

#[derive(Debug, Serialize)]
struct CheckReport {
    mode: ScheduleMode,
    ready: bool,
    days: Vec<DayReport>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    issues: Vec<DayIssue>,
}

fn build_report(state: &ScheduleState) -> CheckReport {
    let uses_slots = state.mode.uses_slots();
    let days: Vec<DayReport> = DayKey::ALL
        .into_iter()
        .map(|day| {
            let status = day_status(state, day);
            let errors = if uses_slots && status != DayStatus::Disabled {
                validate_slots(state.slots_for(day)).err().unwrap_or_default()
            } else {
                Vec::new()
            };
            DayReport {
                day,
                status,
                slots: state.slots_for(day).len(),
                errors,
            }
        })
        .collect();
    let issues = validate_for_submit(state).err().unwrap_or_default();
    let ready = issues.is_empty() && days.iter().all(|d| d.errors.is_empty());
    CheckReport {
        mode: state.mode,
        ready,
        days,
        issues,
    }
}

fn join_errors(errors: &[SlotFieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

// ── Detail views ────────────────────────────────────────────────────

fn mode_header(mode: ScheduleMode, message: &str) -> String {
    let mut out = format!("Mode:    {} ({})\n", mode.label(), mode.tag());
    if !message.trim().is_empty() {
        let _ = writeln!(out, "Message: {message}");
    }
    out
}

fn slot_rows(slots: &goyanova_core::DaySlots, locale: Locale) -> Vec<SlotRow> {
    slots
        .iter()
        .flat_map(|(day, day_slots)| {
            day_slots.iter().enumerate().map(move |(i, slot)| SlotRow {
                day: day.label(locale).to_owned(),
                index: i + 1,
                start: slot.start.to_string(),
                end: slot.end.to_string(),
            })
        })
        .collect()
}

fn nested_detail(nested: &NestedSchedule, locale: Locale) -> String {
    let mut out = mode_header(nested.mode, &nested.message);
    let rows = slot_rows(&nested.slots, locale);
    if rows.is_empty() {
        out.push_str("No slots");
    } else {
        out.push_str(&output::render_table(&rows));
    }
    out
}

fn nested_plain(nested: &NestedSchedule) -> String {
    nested
        .slots
        .iter()
        .flat_map(|(day, slots)| slots.iter().map(move |s| slot_line(*day, s)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn slot_line(day: DayKey, slot: &TimeSlot) -> String {
    format!("{day} {}-{}", slot.start, slot.end)
}

fn check_detail(report: &CheckReport, settings: &Settings) -> String {
    let color = output::should_color(settings.color);
    let mut out = format!("Mode:    {} ({})\n", report.mode.label(), report.mode.tag());
    if report.mode.uses_slots() {
        let rows: Vec<DayRow> = report
            .days
            .iter()
            .map(|d| DayRow {
                day: d.day.label(settings.locale).to_owned(),
                slots: d.slots,
                status: output::status_cell(d.status, color),
                problems: join_errors(&d.errors),
            })
            .collect();
        out.push_str(&output::render_table(&rows));
        out.push('\n');
    }
    for issue in &report.issues {
        let _ = writeln!(out, "  - {issue}");
    }
    out.push_str(&output::verdict(report.ready, color));
    out
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ScheduleArgs, settings: &Settings) -> Result<(), CliError> {
    match args.command {
        ScheduleCommand::Nested { file } => {
            let records: Vec<FlatRecord> = util::read_document(&file)?;
            let nested = to_nested(&records);
            info!(rows = records.len(), days = nested.slots.len(), "grouped rows");
            let out = output::render_single(
                settings.output,
                &nested,
                |n| nested_detail(n, settings.locale),
                nested_plain,
            );
            output::print_output(&out, settings.quiet);
            Ok(())
        }

        ScheduleCommand::Flat { file } => {
            let form: FormState = util::read_document(&file)?;
            let records = to_flat(&schedule_from_form(&form));
            info!(rows = records.len(), "expanded schedule");
            let out = output::render_list(
                settings.output,
                &records,
                |r| RecordRow::from(r),
                |r| {
                    format!(
                        "{} {}-{}",
                        r.day.as_deref().unwrap_or("-"),
                        r.start.as_deref().unwrap_or_default(),
                        r.end.as_deref().unwrap_or_default()
                    )
                },
            );
            output::print_output(&out, settings.quiet);
            Ok(())
        }

        ScheduleCommand::Check { file } => {
            let form: FormState = util::read_document(&file)?;
            let report = build_report(&schedule_from_form(&form));
            let out = output::render_single(
                settings.output,
                &report,
                |r| check_detail(r, settings),
                |r| if r.ready { "ready".into() } else { "not-ready".into() },
            );
            output::print_output(&out, settings.quiet);
            if report.ready {
                Ok(())
            } else {
                let mut problems: Vec<String> =
                    report.issues.iter().map(ToString::to_string).collect();
                problems.extend(
                    report
                        .days
                        .iter()
                        .filter(|d| !d.errors.is_empty())
                        .map(|d| format!("{}: {}", d.day, join_errors(&d.errors))),
                );
                Err(CliError::InvalidSchedule {
                    summary: problems.join("; "),
                })
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use goyanova_core::DaySlots;

    fn state_with(mode: ScheduleMode, slots: &[(DayKey, &str, &str)]) -> ScheduleState {
        let mut map = DaySlots::new();
        for (day, start, end) in slots {
            map.entry(*day)
                .or_default()
                .push(TimeSlot::new(*start, *end));
        }
        ScheduleState::from(NestedSchedule {
            mode,
            message: String::new(),
            slots: map,
        })
    }

    #[test]
    fn complete_schedule_is_ready() {
        let state = state_with(
            ScheduleMode::FixedHours,
            &[(DayKey::Monday, "09:00", "12:00")],
        );
        let report = build_report(&state);
        assert!(report.ready);
        assert_eq!(report.days.len(), 7);
    }

    #[test]
    fn overlapping_slots_make_report_not_ready() {
        let state = state_with(
            ScheduleMode::Shifts,
            &[
                (DayKey::Monday, "09:00", "12:00"),
                (DayKey::Monday, "11:00", "13:00"),
            ],
        );
        let report = build_report(&state);
        assert!(!report.ready);
        assert!(report.issues.is_empty());
        assert_eq!(report.days[0].errors.len(), 1);
    }

    #[test]
    fn modes_without_schedule_skip_slot_checks() {
        let report = build_report(&state_with(ScheduleMode::AskOnContact, &[]));
        assert!(report.ready);
    }

    #[test]
    fn plain_nested_lists_one_slot_per_line() {
        let nested = NestedSchedule {
            slots: state_with(
                ScheduleMode::FixedHours,
                &[
                    (DayKey::Monday, "09:00", "12:00"),
                    (DayKey::Friday, "10:00", "11:00"),
                ],
            )
            .slots,
            ..NestedSchedule::default()
        };
        assert_eq!(
            nested_plain(&nested),
            "monday 09:00-12:00\nfriday 10:00-11:00"
        );
    }
}
