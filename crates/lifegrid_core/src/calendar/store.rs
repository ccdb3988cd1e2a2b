//! Sparse in-memory calendar time store.
//!
//! # Responsibility
//! - Own the nested `year -> month -> week -> day` record map.
//! - Provide point lookup and point update by calendar date.
//! - Expose read-only cell iteration for scanners and search.
//!
//! # Invariants
//! - Every address goes through `DayKey::from_date`; no caller builds keys
//!   from raw dates on its own.
//! - Missing containers are created lazily on write and never removed.
//! - `update_day_data` replaces the whole record (last write wins).

use crate::calendar::key::DayKey;
use crate::model::calendar::{DailyTask, DayRecord, TaskId, YearRecord};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// In-memory calendar data keyed by derived day keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalendarStore {
    years: BTreeMap<i32, YearRecord>,
}

impl CalendarStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes the persisted JSON blob shape.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Decodes the blob and counts tasks that were stored without an `id`.
    ///
    /// Those tasks get fresh ids during decoding; a non-zero count means the
    /// blob must be written back before the ids are handed out.
    pub fn from_json_counting_new_ids(raw: &str) -> Result<(Self, usize), serde_json::Error> {
        let value = serde_json::from_str::<Value>(raw)?;
        let missing = tasks_without_id(&value);
        Ok((serde_json::from_value(value)?, missing))
    }

    /// Encodes the store into the persisted JSON blob shape.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Returns the record stored for `date`, or an empty record.
    pub fn get_day_data<D: Datelike>(&self, date: &D) -> DayRecord {
        self.day_at(DayKey::from_date(date))
            .cloned()
            .unwrap_or_default()
    }

    /// Looks up one cell by key without substituting defaults.
    pub fn day_at(&self, key: DayKey) -> Option<&DayRecord> {
        self.years
            .get(&key.year)?
            .months
            .get(&key.month)?
            .weeks
            .get(&key.week)?
            .days
            .get(&key.day_of_week)
    }

    /// Replaces the record for `date`, creating missing containers.
    pub fn update_day_data<D: Datelike>(&mut self, date: &D, record: DayRecord) {
        *self.day_entry(DayKey::from_date(date)) = record;
    }

    /// Appends `task` to the day's goal list and returns its id.
    pub fn add_task_to_day<D: Datelike>(&mut self, date: &D, task: DailyTask) -> TaskId {
        let mut record = self.get_day_data(date);
        let id = task.id;
        record.goals.push(task);
        self.update_day_data(date, record);
        id
    }

    /// Replaces the task with the same id. Returns `false` when absent.
    pub fn update_task<D: Datelike>(&mut self, date: &D, task: DailyTask) -> bool {
        self.with_task(date, task.id, |slot| *slot = task)
    }

    /// Sets the completion flag of one task. Returns `false` when absent.
    pub fn set_task_completed<D: Datelike>(
        &mut self,
        date: &D,
        id: TaskId,
        completed: bool,
    ) -> bool {
        self.with_task(date, id, |slot| slot.completed = completed)
    }

    /// Removes one task by id. Returns `false` when absent.
    pub fn remove_task<D: Datelike>(&mut self, date: &D, id: TaskId) -> bool {
        let key = DayKey::from_date(date);
        if self.day_at(key).and_then(|day| day.task(id)).is_none() {
            return false;
        }
        let day = self.day_entry(key);
        day.goals.retain(|task| task.id != id);
        true
    }

    /// Returns the stored year record or the `Year N` placeholder.
    pub fn get_year_data(&self, year: i32) -> YearRecord {
        self.years
            .get(&year)
            .cloned()
            .unwrap_or_else(|| YearRecord::default_for(year))
    }

    /// Sets a year title, creating the year record when absent.
    pub fn update_year_title(&mut self, year: i32, title: impl Into<String>) {
        self.year_entry(year).title = title.into();
    }

    /// Iterates stored years in ascending order.
    pub fn years(&self) -> impl Iterator<Item = (i32, &YearRecord)> {
        self.years.iter().map(|(year, record)| (*year, record))
    }

    /// Iterates every stored day cell in key order.
    pub fn cells(&self) -> impl Iterator<Item = (DayKey, &DayRecord)> {
        self.years.iter().flat_map(|(year, year_record)| {
            year_record.months.iter().flat_map(move |(month, month_record)| {
                month_record.weeks.iter().flat_map(move |(week, week_record)| {
                    week_record.days.iter().map(move |(day_of_week, day)| {
                        (DayKey::new(*year, *month, *week, *day_of_week), day)
                    })
                })
            })
        })
    }

    fn with_task<D: Datelike>(
        &mut self,
        date: &D,
        id: TaskId,
        apply: impl FnOnce(&mut DailyTask),
    ) -> bool {
        let key = DayKey::from_date(date);
        if self.day_at(key).and_then(|day| day.task(id)).is_none() {
            return false;
        }
        match self
            .day_entry(key)
            .goals
            .iter_mut()
            .find(|task| task.id == id)
        {
            Some(task) => {
                apply(task);
                true
            }
            None => false,
        }
    }

    fn year_entry(&mut self, year: i32) -> &mut YearRecord {
        self.years
            .entry(year)
            .or_insert_with(|| YearRecord::default_for(year))
    }

    fn day_entry(&mut self, key: DayKey) -> &mut DayRecord {
        self.year_entry(key.year)
            .months
            .entry(key.month)
            .or_default()
            .weeks
            .entry(key.week)
            .or_default()
            .days
            .entry(key.day_of_week)
            .or_default()
    }
}

fn tasks_without_id(blob: &Value) -> usize {
    let Some(years) = blob.as_object() else {
        return 0;
    };
    years
        .values()
        .filter_map(|year| year.get("months")?.as_object())
        .flat_map(|months| months.values())
        .filter_map(|month| month.get("weeks")?.as_object())
        .flat_map(|weeks| weeks.values())
        .filter_map(|week| week.get("days")?.as_object())
        .flat_map(|days| days.values())
        .filter_map(|day| day.get("goals")?.as_array())
        .flatten()
        .filter(|task| task.get("id").is_none())
        .count()
}

#[cfg(test)]
mod tests {
    use super::CalendarStore;
    use crate::calendar::key::DayKey;
    use crate::model::calendar::{DailyTask, DayRecord};
    use chrono::NaiveDate;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn missing_day_reads_as_empty_record() {
        let store = CalendarStore::new();
        assert_eq!(store.get_day_data(&date(2026, 5, 1)), DayRecord::default());
        assert!(store.is_empty());
    }

    #[test]
    fn update_task_and_toggle_complete_by_id() {
        let mut store = CalendarStore::new();
        let day = date(2026, 5, 12);
        let id = store.add_task_to_day(&day, DailyTask::task("Run"));

        let mut edited = store.get_day_data(&day).goals[0].clone();
        edited.text = "Run 5k".to_string();
        assert!(store.update_task(&day, edited));
        assert!(store.set_task_completed(&day, id, true));

        let task = &store.get_day_data(&day).goals[0];
        assert_eq!(task.text, "Run 5k");
        assert!(task.completed);
    }

    #[test]
    fn remove_task_targets_id_not_position() {
        let mut store = CalendarStore::new();
        let day = date(2026, 5, 12);
        let first = store.add_task_to_day(&day, DailyTask::task("A"));
        let second = store.add_task_to_day(&day, DailyTask::task("B"));

        assert!(store.remove_task(&day, first));
        assert!(!store.remove_task(&day, first));
        let goals = store.get_day_data(&day).goals;
        assert_eq!(goals.len(), 1);
        assert_eq!(goals[0].id, second);
    }

    #[test]
    fn unknown_task_id_does_not_create_containers() {
        let mut store = CalendarStore::new();
        let stray = DailyTask::task("ghost");
        assert!(!store.update_task(&date(2026, 1, 1), stray));
        assert!(store.is_empty());
    }

    #[test]
    fn year_title_defaults_and_updates() {
        let mut store = CalendarStore::new();
        assert_eq!(store.get_year_data(2031).title, "Year 2031");

        store.update_year_title(2031, "Sabbatical");
        assert_eq!(store.get_year_data(2031).title, "Sabbatical");
    }

    #[test]
    fn cells_yield_derived_keys() {
        let mut store = CalendarStore::new();
        store.update_day_data(&date(2026, 4, 5), DayRecord::new("Easter"));

        let cells = store.cells().collect::<Vec<_>>();
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].0, DayKey::new(2026, 3, 1, 0));
        assert_eq!(cells[0].1.title, "Easter");
    }

    #[test]
    fn json_blob_uses_string_keys_and_round_trips() {
        let mut store = CalendarStore::new();
        store.update_day_data(&date(2026, 4, 5), DayRecord::new("Easter"));

        let json = store.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(
            value["2026"]["months"]["3"]["weeks"]["1"]["days"]["0"]["title"],
            "Easter"
        );
        assert_eq!(CalendarStore::from_json(&json).unwrap(), store);
    }

    #[test]
    fn decoding_counts_tasks_stored_without_id() {
        let raw = r#"{"2026":{"title":"Year 2026","months":{"2":{"weeks":{"2":{"days":{"3":{"title":"","goals":[
            {"text":"legacy","type":"task","completed":false},
            {"id":"6f1c1d1e-8d43-4a5e-9a7e-2d1f0c3b4a59","text":"modern"}
        ]}}}}}}}}"#;

        let (store, new_ids) = CalendarStore::from_json_counting_new_ids(raw).unwrap();
        assert_eq!(new_ids, 1);
        assert_eq!(store.get_day_data(&date(2026, 3, 18)).goals.len(), 2);

        let (_, again) = CalendarStore::from_json_counting_new_ids(&store.to_json().unwrap()).unwrap();
        assert_eq!(again, 0);
    }
}
