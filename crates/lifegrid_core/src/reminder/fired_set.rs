//! Persisted set of reminders that already produced a notification.
//!
//! # Invariants
//! - Entries map reminder id to the ISO-8601 instant it fired.
//! - The set only grows; nothing prunes it.
//! - A blob that fails to decode is treated as empty (reminders may fire
//!   once more after storage corruption).

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const FIRED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// Reminder id -> fired-at timestamp.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FiredSet {
    entries: BTreeMap<String, String>,
}

impl FiredSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes a persisted blob; returns `None` when it is corrupt.
    pub fn from_json(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn contains(&self, reminder_id: &str) -> bool {
        self.entries.contains_key(reminder_id)
    }

    /// Records `reminder_id` as fired. Returns `false` if it already was.
    pub fn record(&mut self, reminder_id: impl Into<String>, fired_at: NaiveDateTime) -> bool {
        let reminder_id = reminder_id.into();
        if self.entries.contains_key(&reminder_id) {
            return false;
        }
        self.entries
            .insert(reminder_id, fired_at.format(FIRED_AT_FORMAT).to_string());
        true
    }

    pub fn fired_at(&self, reminder_id: &str) -> Option<&str> {
        self.entries.get(reminder_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
