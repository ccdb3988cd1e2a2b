//! Derived storage key for calendar day records.
//!
//! # Responsibility
//! - Map a calendar date to its `(year, month, week, day_of_week)` cell.
//! - Provide the approximate inverse used by reminder scans and search.
//!
//! # Invariants
//! - `week = floor((day_of_month + first_weekday_of_month - 1) / 7)`.
//! - `month` is zero-based (0 = January); weekdays count from Sunday = 0.
//! - Derivation reads only year/month/day, never time-of-day.
//! - `approximate_date` is not a faithful inverse: it adds
//!   `week * 7 + day_of_week` days to the first of the month, overflowing
//!   into the next month the way the stored data was produced.

use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Grid-relative address of one day record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct DayKey {
    pub year: i32,
    /// Zero-based month index.
    pub month: u32,
    /// Week bucket within the month grid, not an ISO week.
    pub week: u32,
    /// 0 = Sunday .. 6 = Saturday.
    pub day_of_week: u32,
}

impl DayKey {
    pub fn new(year: i32, month: u32, week: u32, day_of_week: u32) -> Self {
        Self {
            year,
            month,
            week,
            day_of_week,
        }
    }

    /// Derives the storage key for `date`.
    pub fn from_date<D: Datelike>(date: &D) -> Self {
        let day_of_week = date.weekday().num_days_from_sunday();
        let first_weekday = first_weekday_of_month(date);
        Self {
            year: date.year(),
            month: date.month0(),
            week: (date.day() + first_weekday - 1) / 7,
            day_of_week,
        }
    }

    /// Reconstructs an approximate calendar date from the key.
    ///
    /// Returns `None` only for keys outside chrono's supported range.
    pub fn approximate_date(&self) -> Option<NaiveDate> {
        let first = NaiveDate::from_ymd_opt(self.year, self.month + 1, 1)?;
        let offset = u64::from(self.week) * 7 + u64::from(self.day_of_week);
        first.checked_add_days(Days::new(offset))
    }
}

impl Display for DayKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}-{}-{}-{}",
            self.year, self.month, self.week, self.day_of_week
        )
    }
}

/// Weekday (0 = Sunday) of the first day of `date`'s month.
pub fn first_weekday_of_month<D: Datelike>(date: &D) -> u32 {
    let weekday = date.weekday().num_days_from_sunday();
    (weekday + 7 - date.day0() % 7) % 7
}
