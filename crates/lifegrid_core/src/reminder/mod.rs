//! Reminder detection over the calendar time store.
//!
//! # Responsibility
//! - Find tasks whose reminder time of day has passed.
//! - Track already-fired reminders so each fires once.
//!
//! # See also
//! - `service::reminder_service` for the interval loop and persistence.

pub mod fired_set;
pub mod scanner;
