//! Reminder scanner lifecycle.
//!
//! # Responsibility
//! - Load the fired-set at start, run scans on a fixed interval, persist the
//!   fired-set whenever it changes, and stop on teardown.
//!
//! # Invariants
//! - A reminder id produces at most one notification, across restarts.
//! - Scans run synchronously to completion; `now` is supplied by the caller's
//!   event loop.
//! - A stopped scanner ignores ticks.
//! - A failed fired-set write keeps the in-memory set and reports
//!   `ErrorSaving`; the reminder may fire again after a restart.

use crate::calendar::store::CalendarStore;
use crate::model::notification::Notification;
use crate::reminder::fired_set::FiredSet;
use crate::reminder::scanner::find_due_reminders;
use crate::repo::blob_repo::{BlobRepository, REMINDERS_FIRED_BLOB_KEY};
use crate::service::session::StoreStatus;
use chrono::{NaiveDateTime, TimeDelta};
use log::{error, info, warn};

/// Seconds between two scans.
pub const REMINDER_SCAN_INTERVAL_SECS: i64 = 30;

const REMINDER_TITLE: &str = "Reminder";

/// Interval-driven reminder scanner with a persisted fired-set.
pub struct ReminderScanner<B: BlobRepository> {
    blobs: B,
    fired: FiredSet,
    last_scan: Option<NaiveDateTime>,
    running: bool,
    status: StoreStatus,
}

impl<B: BlobRepository> ReminderScanner<B> {
    /// Loads the fired-set and starts the interval.
    pub fn start(blobs: B) -> Self {
        let (fired, status) = match blobs.get_blob(REMINDERS_FIRED_BLOB_KEY) {
            Ok(None) => (FiredSet::new(), StoreStatus::Loaded),
            Ok(Some(raw)) => match FiredSet::from_json(&raw) {
                Some(fired) => (fired, StoreStatus::Loaded),
                None => {
                    warn!(
                        "event=reminder_start module=service status=error error_code=fired_set_decode_failed"
                    );
                    (FiredSet::new(), StoreStatus::ErrorLoading)
                }
            },
            Err(err) => {
                error!(
                    "event=reminder_start module=service status=error error_code=fired_set_read_failed error={}",
                    err
                );
                (FiredSet::new(), StoreStatus::ErrorLoading)
            }
        };
        info!(
            "event=reminder_start module=service status={} fired={}",
            if status.is_error() { "degraded" } else { "ok" },
            fired.len()
        );
        Self {
            blobs,
            fired,
            last_scan: None,
            running: true,
            status,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Outcome of the last fired-set load or write.
    pub fn status(&self) -> StoreStatus {
        self.status
    }

    pub fn fired(&self) -> &FiredSet {
        &self.fired
    }

    /// Cancels the interval; later ticks do nothing.
    pub fn stop(&mut self) {
        if self.running {
            self.running = false;
            info!("event=reminder_stop module=service status=ok");
        }
    }

    /// Runs a scan when the interval has elapsed since the previous one.
    pub fn tick(&mut self, store: &CalendarStore, now: NaiveDateTime) -> Vec<Notification> {
        if !self.running {
            return Vec::new();
        }
        let interval = TimeDelta::seconds(REMINDER_SCAN_INTERVAL_SECS);
        match self.last_scan {
            Some(last) if now - last < interval => Vec::new(),
            _ => self.scan(store, now),
        }
    }

    /// Scans the whole store once and fires every due, unfired reminder.
    pub fn scan(&mut self, store: &CalendarStore, now: NaiveDateTime) -> Vec<Notification> {
        self.last_scan = Some(now);
        let mut notifications = Vec::new();

        for due in find_due_reminders(store, now) {
            if !self.fired.record(due.reminder_id, now) {
                continue;
            }
            // Ids are timestamps; offset by position to stay unique per scan.
            let created_at = now + TimeDelta::milliseconds(notifications.len() as i64);
            notifications.push(Notification::new(
                created_at,
                REMINDER_TITLE,
                format!("{} ({})", due.text, due.due_at.format("%H:%M")),
            ));
        }

        if !notifications.is_empty() {
            self.persist();
            info!(
                "event=reminder_scan module=service status=ok fired={}",
                notifications.len()
            );
        }
        notifications
    }

    fn persist(&mut self) {
        let result = self
            .fired
            .to_json()
            .map_err(|err| err.to_string())
            .and_then(|json| {
                self.blobs
                    .put_blob(REMINDERS_FIRED_BLOB_KEY, &json)
                    .map_err(|err| err.to_string())
            });
        self.status = match result {
            Ok(()) => StoreStatus::Saved,
            Err(err) => {
                error!(
                    "event=reminder_persist module=service status=error error_code=fired_set_write_failed error={}",
                    err
                );
                StoreStatus::ErrorSaving
            }
        };
    }
}
