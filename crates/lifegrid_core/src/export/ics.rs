//! iCalendar export of active simulation deltas.
//!
//! # Invariants
//! - One `VEVENT` per active delta, in delta order.
//! - Each event starts at the caller's local start instant, lasts
//!   `|delta_minutes|` and repeats daily for [`ICS_REPEAT_COUNT`] days.
//! - Lines end with CRLF; times are floating local times.

use crate::simulation::delta::{Delta, DeltaSet};
use chrono::{NaiveDateTime, TimeDelta};
use uuid::Uuid;

/// Daily occurrences emitted per habit event.
pub const ICS_REPEAT_COUNT: u32 = 30;

const PRODUCT_ID: &str = "-//LifeGrid//Habit Export//EN";
const ICS_TIME_FORMAT: &str = "%Y%m%dT%H%M%S";
const CRLF: &str = "\r\n";

/// Renders `deltas` as a `VCALENDAR` document.
///
/// `start` is the first occurrence of every event and `now` stamps the
/// document. An empty delta set yields a calendar with no events.
pub fn export_deltas_ics(deltas: &DeltaSet, start: NaiveDateTime, now: NaiveDateTime) -> String {
    let mut lines = vec![
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        format!("PRODID:{PRODUCT_ID}"),
        "CALSCALE:GREGORIAN".to_string(),
    ];
    for delta in deltas.as_slice() {
        push_event(&mut lines, delta, start, now);
    }
    lines.push("END:VCALENDAR".to_string());

    let mut document = lines.join(CRLF);
    document.push_str(CRLF);
    document
}

/// Event title, e.g. `Add 30 min Exercise` or `Reduce 15 min Sleep`.
pub fn event_summary(delta: &Delta) -> String {
    let verb = if delta.delta_minutes >= 0 { "Add" } else { "Reduce" };
    format!(
        "{verb} {} min {}",
        delta.delta_minutes.unsigned_abs(),
        delta.name.label()
    )
}

fn push_event(lines: &mut Vec<String>, delta: &Delta, start: NaiveDateTime, now: NaiveDateTime) {
    let minutes = i64::try_from(delta.delta_minutes.unsigned_abs()).unwrap_or(i64::MAX);
    let end = TimeDelta::try_minutes(minutes)
        .and_then(|length| start.checked_add_signed(length))
        .unwrap_or(start);
    lines.push("BEGIN:VEVENT".to_string());
    lines.push(format!("UID:{}@lifegrid", Uuid::new_v4()));
    lines.push(format!("DTSTAMP:{}", now.format(ICS_TIME_FORMAT)));
    lines.push(format!("DTSTART:{}", start.format(ICS_TIME_FORMAT)));
    lines.push(format!("DTEND:{}", end.format(ICS_TIME_FORMAT)));
    lines.push(format!("RRULE:FREQ=DAILY;COUNT={ICS_REPEAT_COUNT}"));
    lines.push(format!("SUMMARY:{}", escape_text(&event_summary(delta))));
    lines.push("END:VEVENT".to_string());
}

fn escape_text(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace(';', "\\;")
        .replace(',', "\\,")
        .replace('\n', "\\n")
}
