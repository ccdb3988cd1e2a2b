//! Domain model for life profiles, calendar records and notifications.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep wire shapes compatible with persisted JSON blobs.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId`.
//! - Category registry is fixed and immutable.

pub mod calendar;
pub mod category;
pub mod notification;
pub mod profile;
