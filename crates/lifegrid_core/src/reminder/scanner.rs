//! Due-reminder detection.
//!
//! # Invariants
//! - Only tasks that are not completed and carry a non-blank, parseable
//!   `reminder` are considered.
//! - The target instant is `DayKey::approximate_date()` plus the reminder
//!   time of day, so tasks near month boundaries can fire on a shifted day.
//! - Reminder ids have the shape `task-{year}-{month}-{week}-{day}-{text}`.

use crate::calendar::key::DayKey;
use crate::calendar::store::CalendarStore;
use crate::model::calendar::{DailyTask, TaskId};
use chrono::NaiveDateTime;
use log::debug;

/// One reminder whose target instant is at or before `now`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DueReminder {
    pub reminder_id: String,
    pub key: DayKey,
    pub task_id: TaskId,
    pub text: String,
    pub due_at: NaiveDateTime,
}

/// Builds the idempotency key for one task reminder.
pub fn reminder_id(key: DayKey, task: &DailyTask) -> String {
    format!(
        "task-{}-{}-{}-{}-{}",
        key.year, key.month, key.week, key.day_of_week, task.text
    )
}

/// Walks every stored cell and returns reminders due at `now`.
///
/// Fired-state filtering is the caller's job.
pub fn find_due_reminders(store: &CalendarStore, now: NaiveDateTime) -> Vec<DueReminder> {
    let mut due = Vec::new();
    for (key, day) in store.cells() {
        for task in day.goals.iter().filter(|task| !task.completed && task.has_reminder()) {
            let Some(time) = task.reminder_time() else {
                debug!(
                    "event=reminder_scan module=reminder status=skip cell={} error_code=reminder_unparseable",
                    key
                );
                continue;
            };
            let Some(date) = key.approximate_date() else {
                continue;
            };
            let due_at = date.and_time(time);
            if now >= due_at {
                due.push(DueReminder {
                    reminder_id: reminder_id(key, task),
                    key,
                    task_id: task.id,
                    text: task.text.clone(),
                    due_at,
                });
            }
        }
    }
    due
}

#[cfg(test)]
mod tests {
    use super::{find_due_reminders, reminder_id};
    use crate::calendar::key::DayKey;
    use crate::calendar::store::CalendarStore;
    use crate::model::calendar::DailyTask;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn reminder_id_uses_key_and_text() {
        let task = DailyTask::task("Stretch");
        assert_eq!(
            reminder_id(DayKey::new(2026, 2, 2, 3), &task),
            "task-2026-2-2-3-Stretch"
        );
    }

    #[test]
    fn past_reminders_are_due_and_future_ones_are_not() {
        // March 2026 starts on Sunday, so approximate dates are exact.
        let day = NaiveDate::from_ymd_opt(2026, 3, 18).unwrap();
        let mut store = CalendarStore::new();
        store.add_task_to_day(&day, DailyTask::task("Morning pills").with_reminder("08:00"));
        store.add_task_to_day(&day, DailyTask::task("Evening walk").with_reminder("19:30"));

        let due = find_due_reminders(&store, at(2026, 3, 18, 12, 0));
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].text, "Morning pills");
        assert_eq!(due[0].due_at, at(2026, 3, 18, 8, 0));
    }

    #[test]
    fn completed_blank_and_malformed_reminders_are_skipped() {
        let day = NaiveDate::from_ymd_opt(2026, 3, 18).unwrap();
        let mut store = CalendarStore::new();
        let mut done = DailyTask::task("Done already").with_reminder("07:00");
        done.completed = true;
        store.add_task_to_day(&day, done);
        store.add_task_to_day(&day, DailyTask::task("Blank").with_reminder("  "));
        store.add_task_to_day(&day, DailyTask::task("Broken").with_reminder("soon"));

        assert!(find_due_reminders(&store, at(2026, 3, 19, 0, 0)).is_empty());
    }
}
