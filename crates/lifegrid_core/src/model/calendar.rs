//! Calendar record model.
//!
//! # Responsibility
//! - Define the nested year/month/week/day record shapes.
//! - Define daily tasks/events owned by one day record.
//!
//! # Invariants
//! - Every task has a stable `id`; list position is not identity.
//! - Container maps are sparse: absent keys mean "no data yet".
//! - `reminder` and `time` are `HH:MM` times of day when set.
//!
//! # See also
//! - `calendar::key` for how records are addressed.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable task identifier generated at creation.
pub type TaskId = Uuid;

const TIME_OF_DAY_FORMAT: &str = "%H:%M";

/// Task flavor stored on the wire as `type`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    #[default]
    Task,
    Event,
}

/// Recurrence marker kept with a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepeatRule {
    #[default]
    None,
    Daily,
    Weekly,
}

/// Validation errors for task shape invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    EmptyText,
    InvalidTimeOfDay { field: &'static str, value: String },
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "task text must not be blank"),
            Self::InvalidTimeOfDay { field, value } => {
                write!(f, "`{field}` must be HH:MM, got `{value}`")
            }
        }
    }
}

impl Error for TaskValidationError {}

/// One task or event owned by a day record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyTask {
    /// Generated for legacy rows that predate stable ids.
    #[serde(default = "new_task_id")]
    pub id: TaskId,
    pub text: String,
    #[serde(rename = "type", default)]
    pub kind: TaskKind,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guests: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat: Option<RepeatRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder: Option<String>,
}

impl DailyTask {
    /// Creates a task with a fresh id and no optional fields.
    pub fn new(kind: TaskKind, text: impl Into<String>) -> Self {
        Self {
            id: new_task_id(),
            text: text.into(),
            kind,
            completed: false,
            description: None,
            time: None,
            location: None,
            guests: None,
            link: None,
            repeat: None,
            reminder: None,
        }
    }

    pub fn task(text: impl Into<String>) -> Self {
        Self::new(TaskKind::Task, text)
    }

    pub fn event(text: impl Into<String>) -> Self {
        Self::new(TaskKind::Event, text)
    }

    /// Sets the reminder time of day (`HH:MM`).
    pub fn with_reminder(mut self, reminder: impl Into<String>) -> Self {
        self.reminder = Some(reminder.into());
        self
    }

    /// Checks text and time-of-day fields.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.text.trim().is_empty() {
            return Err(TaskValidationError::EmptyText);
        }
        for (field, value) in [("time", &self.time), ("reminder", &self.reminder)] {
            if let Some(value) = value.as_deref().filter(|value| !value.trim().is_empty()) {
                parse_time_of_day(value).ok_or_else(|| TaskValidationError::InvalidTimeOfDay {
                    field,
                    value: value.to_string(),
                })?;
            }
        }
        Ok(())
    }

    /// Parsed reminder time, `None` when unset, blank or malformed.
    pub fn reminder_time(&self) -> Option<NaiveTime> {
        self.reminder
            .as_deref()
            .filter(|value| !value.trim().is_empty())
            .and_then(parse_time_of_day)
    }

    pub fn has_reminder(&self) -> bool {
        self.reminder
            .as_deref()
            .is_some_and(|value| !value.trim().is_empty())
    }

    /// Lowercased concatenation of every searchable field.
    pub fn searchable_text(&self) -> String {
        [
            Some(self.text.as_str()),
            self.description.as_deref(),
            self.location.as_deref(),
            self.link.as_deref(),
            self.guests.as_deref(),
        ]
        .into_iter()
        .flatten()
        .filter(|value| !value.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
    }
}

/// Parses an `HH:MM` time of day.
pub fn parse_time_of_day(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), TIME_OF_DAY_FORMAT).ok()
}

fn new_task_id() -> TaskId {
    Uuid::new_v4()
}

/// Leaf record for one calendar day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRecord {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub goals: Vec<DailyTask>,
}

impl DayRecord {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            goals: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.goals.is_empty()
    }

    pub fn task(&self, id: TaskId) -> Option<&DailyTask> {
        self.goals.iter().find(|task| task.id == id)
    }
}

/// Days keyed by day-of-week (0 = Sunday).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekRecord {
    #[serde(default)]
    pub days: BTreeMap<u32, DayRecord>,
}

/// Week buckets keyed by grid-relative week index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthRecord {
    #[serde(default)]
    pub weeks: BTreeMap<u32, WeekRecord>,
}

/// Months keyed by zero-based month index (0 = January).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRecord {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub months: BTreeMap<u32, MonthRecord>,
}

impl YearRecord {
    /// Placeholder substituted for years with no stored data.
    pub fn default_for(year: i32) -> Self {
        Self {
            title: format!("Year {year}"),
            months: BTreeMap::new(),
        }
    }
}
