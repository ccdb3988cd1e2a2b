//! In-app notification model.
//!
//! Notifications are transient: they are shown for a fixed duration and never
//! persisted.

use chrono::{NaiveDateTime, TimeDelta};
use serde::Serialize;

/// How long a notification stays in the active list.
pub const NOTIFICATION_DISPLAY_MS: i64 = 5_000;

/// One user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// Creation timestamp in epoch milliseconds; doubles as identifier.
    pub id: i64,
    pub title: String,
    pub message: String,
}

impl Notification {
    pub fn new(
        created_at: NaiveDateTime,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: created_at.and_utc().timestamp_millis(),
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Active notification list with time-based expiry.
#[derive(Debug, Default)]
pub struct NotificationCenter {
    active: Vec<Notification>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, notification: Notification) {
        self.active.push(notification);
    }

    /// Drops expired notifications and returns the ones still visible.
    pub fn active(&mut self, now: NaiveDateTime) -> &[Notification] {
        let cutoff = (now - TimeDelta::milliseconds(NOTIFICATION_DISPLAY_MS))
            .and_utc()
            .timestamp_millis();
        self.active.retain(|notification| notification.id > cutoff);
        &self.active
    }

    /// Removes one notification before it expires.
    pub fn dismiss(&mut self, id: i64) -> bool {
        let before = self.active.len();
        self.active.retain(|notification| notification.id != id);
        self.active.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::{Notification, NotificationCenter, NOTIFICATION_DISPLAY_MS};
    use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 1)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn notifications_expire_after_display_duration() {
        let created = at(9, 0);
        let mut center = NotificationCenter::new();
        center.push(Notification::new(created, "Reminder", "Stretch"));

        assert_eq!(center.active(created + TimeDelta::seconds(1)).len(), 1);
        let expired_at = created + TimeDelta::milliseconds(NOTIFICATION_DISPLAY_MS);
        assert!(center.active(expired_at).is_empty());
    }

    #[test]
    fn dismiss_removes_by_id() {
        let created = at(9, 0);
        let mut center = NotificationCenter::new();
        let notification = Notification::new(created, "Reminder", "Walk");
        let id = notification.id;
        center.push(notification);

        assert!(center.dismiss(id));
        assert!(!center.dismiss(id));
    }
}
