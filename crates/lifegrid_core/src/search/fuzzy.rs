//! Weighted substring search over the calendar time store.
//!
//! # Responsibility
//! - Collect searchable candidates (year titles, day titles, tasks).
//! - Rank matches with the fixed scoring heuristic and keep the top 10.
//! - Serve the literal `events` query as an upcoming-events listing.
//!   Only the exact, untrimmed, lowercase query qualifies; `Events` or
//!   ` events ` are scored as ordinary text.
//!
//! # Invariants
//! - Matching is case-insensitive substring containment.
//! - Ties keep store iteration order (stable sort).
//! - Month/week result kinds carry weights but are never produced.
//! - Candidate dates use `DayKey::approximate_date`, like reminder scans.

use crate::calendar::key::DayKey;
use crate::calendar::store::CalendarStore;
use crate::model::calendar::{TaskId, TaskKind};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::cmp::Ordering;

/// Maximum hits returned by one search.
pub const SEARCH_RESULT_LIMIT: usize = 10;
/// Query that lists upcoming events instead of scoring.
pub const EVENTS_QUERY: &str = "events";

const SUBSTRING_BONUS: f64 = 10.0;
const EXACT_BONUS: f64 = 30.0;
const PREFIX_BONUS: f64 = 15.0;
const POSITION_ZERO_BONUS: f64 = 10.0;
const TYPE_WEIGHT_FACTOR: f64 = 12.0;
const RECENCY_BASE: f64 = 120.0;
const MONTH_KEYWORD_BONUS: f64 = 60.0;
const YEAR_KEYWORD_BONUS: f64 = 50.0;

const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

static MONTH_KEYWORD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"\b({})\b", MONTH_NAMES.join("|"))).expect("valid month keyword regex")
});
static YEAR_KEYWORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(20\d{2})\b").expect("valid year keyword regex"));

/// Kind of calendar item a hit points to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchResultKind {
    Year,
    Month,
    Week,
    Day,
    Goal,
}

impl SearchResultKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::Month => "month",
            Self::Week => "week",
            Self::Day => "day",
            Self::Goal => "goal",
        }
    }

    fn weight(self) -> f64 {
        match self {
            Self::Year => 6.0,
            Self::Month => 5.0,
            Self::Week => 4.0,
            Self::Day => 3.0,
            Self::Goal => 2.0,
        }
    }
}

/// One ranked search result with navigation coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub kind: SearchResultKind,
    /// Display text: year/day title or task text.
    pub title: String,
    pub year: i32,
    pub month: Option<u32>,
    pub week: Option<u32>,
    pub day_of_week: Option<u32>,
    pub task_id: Option<TaskId>,
    /// Approximate calendar date for day/goal hits.
    pub date: Option<NaiveDate>,
    pub score: f64,
}

struct Candidate {
    hit: SearchHit,
    haystack: String,
}

#[derive(Debug, Default, PartialEq, Eq)]
struct QueryHints {
    month: Option<u32>,
    year: Option<i32>,
}

/// Searches the store for `query` relative to `now`.
///
/// Returns an empty list for blank queries.
pub fn search_calendar(store: &CalendarStore, query: &str, now: NaiveDateTime) -> Vec<SearchHit> {
    let today = now.date();
    if query == EVENTS_QUERY {
        return upcoming_events(store, today);
    }

    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let hints = parse_hints(&needle);
    let mut hits = collect_candidates(store)
        .into_iter()
        .filter_map(|candidate| {
            let position = candidate.haystack.find(&needle)?;
            let mut hit = candidate.hit;
            hit.score = score(&candidate.haystack, &needle, position, &hit, &hints, today);
            Some(hit)
        })
        .collect::<Vec<_>>();

    hits.sort_by(|left, right| {
        right
            .score
            .partial_cmp(&left.score)
            .unwrap_or(Ordering::Equal)
    });
    hits.truncate(SEARCH_RESULT_LIMIT);
    hits
}

/// Future event tasks (`date >= today`) in ascending date order.
fn upcoming_events(store: &CalendarStore, today: NaiveDate) -> Vec<SearchHit> {
    let mut events = Vec::new();
    for (key, day) in store.cells() {
        let Some(date) = key.approximate_date() else {
            continue;
        };
        if date < today {
            continue;
        }
        for task in day.goals.iter().filter(|task| task.kind == TaskKind::Event) {
            events.push(goal_hit(key, Some(date), task.id, task.text.clone()));
        }
    }
    events.sort_by_key(|hit| hit.date);
    events.truncate(SEARCH_RESULT_LIMIT);
    events
}

fn collect_candidates(store: &CalendarStore) -> Vec<Candidate> {
    let mut candidates = Vec::new();

    for (year, record) in store.years() {
        if !record.title.is_empty() {
            candidates.push(Candidate {
                haystack: record.title.to_lowercase(),
                hit: SearchHit {
                    kind: SearchResultKind::Year,
                    title: record.title.clone(),
                    year,
                    month: None,
                    week: None,
                    day_of_week: None,
                    task_id: None,
                    date: None,
                    score: 0.0,
                },
            });
        }
    }

    for (key, day) in store.cells() {
        let date = key.approximate_date();
        if !day.title.is_empty() {
            candidates.push(Candidate {
                haystack: day.title.to_lowercase(),
                hit: SearchHit {
                    kind: SearchResultKind::Day,
                    title: day.title.clone(),
                    year: key.year,
                    month: Some(key.month),
                    week: Some(key.week),
                    day_of_week: Some(key.day_of_week),
                    task_id: None,
                    date,
                    score: 0.0,
                },
            });
        }
        for task in &day.goals {
            candidates.push(Candidate {
                haystack: task.searchable_text(),
                hit: goal_hit(key, date, task.id, task.text.clone()),
            });
        }
    }

    candidates
}

fn goal_hit(key: DayKey, date: Option<NaiveDate>, task_id: TaskId, title: String) -> SearchHit {
    SearchHit {
        kind: SearchResultKind::Goal,
        title,
        year: key.year,
        month: Some(key.month),
        week: Some(key.week),
        day_of_week: Some(key.day_of_week),
        task_id: Some(task_id),
        date,
        score: 0.0,
    }
}

fn score(
    haystack: &str,
    needle: &str,
    position: usize,
    hit: &SearchHit,
    hints: &QueryHints,
    today: NaiveDate,
) -> f64 {
    let mut total = SUBSTRING_BONUS;
    if haystack == needle {
        total += EXACT_BONUS;
    }
    if haystack.starts_with(needle) {
        total += PREFIX_BONUS;
    }
    // Overlaps with the prefix bonus; both are kept.
    if position == 0 {
        total += POSITION_ZERO_BONUS;
    }

    total += hit.kind.weight() * TYPE_WEIGHT_FACTOR;
    total += recency_score(hit.year, today.year());
    if let Some(date) = hit.date {
        total += proximity_bonus((date - today).num_days().abs());
    }
    if hints.month.is_some() && hints.month == hit.month {
        total += MONTH_KEYWORD_BONUS;
    }
    if hints.year == Some(hit.year) {
        total += YEAR_KEYWORD_BONUS;
    }
    total
}

fn recency_score(year: i32, current_year: i32) -> f64 {
    let distance = f64::from((year - current_year).abs());
    RECENCY_BASE / (1.0 + distance * 0.5)
}

fn proximity_bonus(days_away: i64) -> f64 {
    match days_away {
        0..=7 => 40.0,
        8..=30 => 25.0,
        31..=90 => 10.0,
        _ => 0.0,
    }
}

fn parse_hints(needle: &str) -> QueryHints {
    let month = MONTH_KEYWORD_RE
        .find(needle)
        .and_then(|found| MONTH_NAMES.iter().position(|name| *name == found.as_str()))
        .map(|index| index as u32);
    let year = YEAR_KEYWORD_RE
        .captures(needle)
        .and_then(|caps| caps.get(1))
        .and_then(|value| value.as_str().parse::<i32>().ok());
    QueryHints { month, year }
}

#[cfg(test)]
mod tests {
    use super::{parse_hints, proximity_bonus, recency_score, QueryHints};

    #[test]
    fn hints_pick_month_name_and_20xx_year() {
        assert_eq!(
            parse_hints("trip in march 2027"),
            QueryHints {
                month: Some(2),
                year: Some(2027)
            }
        );
        assert_eq!(parse_hints("room 1999"), QueryHints::default());
    }

    #[test]
    fn month_hint_needs_a_whole_word() {
        assert_eq!(parse_hints("maybe later"), QueryHints::default());
        assert_eq!(parse_hints("junebug marches"), QueryHints::default());
        assert_eq!(parse_hints("dinner, may 3").month, Some(4));
    }

    #[test]
    fn recency_decays_with_year_distance() {
        assert_eq!(recency_score(2026, 2026), 120.0);
        assert_eq!(recency_score(2024, 2026), 60.0);
        assert_eq!(recency_score(2028, 2026), 60.0);
    }

    #[test]
    fn proximity_bands() {
        assert_eq!(proximity_bonus(0), 40.0);
        assert_eq!(proximity_bonus(7), 40.0);
        assert_eq!(proximity_bonus(8), 25.0);
        assert_eq!(proximity_bonus(30), 25.0);
        assert_eq!(proximity_bonus(90), 10.0);
        assert_eq!(proximity_bonus(91), 0.0);
    }
}
