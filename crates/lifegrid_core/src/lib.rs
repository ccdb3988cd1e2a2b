//! Core domain logic for LifeGrid.
//! This crate is the single source of truth for life-profile and calendar invariants.

pub mod calendar;
pub mod db;
pub mod export;
pub mod logging;
pub mod model;
pub mod reminder;
pub mod repo;
pub mod search;
pub mod service;
pub mod simulation;

pub use calendar::key::DayKey;
pub use calendar::store::CalendarStore;
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use export::ics::export_deltas_ics;
pub use logging::{default_log_level, init_logging, log_session_start, logging_status, LogConfig};
pub use model::calendar::{DailyTask, DayRecord, TaskId, TaskKind, TaskValidationError, YearRecord};
pub use model::category::{categories, ActivityCategory, CategoryName, MINUTES_PER_DAY};
pub use model::notification::{Notification, NotificationCenter};
pub use model::profile::{ActivityAllocation, LifeProfile, ProfileValidationError};
pub use repo::blob_repo::{BlobRepository, SqliteBlobRepository};
pub use repo::user_row_repo::{SqliteUserRowRepository, UserRowRepository};
pub use repo::{RepoError, RepoResult};
pub use search::fuzzy::{search_calendar, SearchHit, SearchResultKind};
pub use service::calendar_service::CalendarService;
pub use service::notes_service::NotesService;
pub use service::profile_service::ProfileService;
pub use service::reminder_service::ReminderScanner;
pub use service::session::{Session, StoreStatus};
pub use simulation::delta::{apply_deltas, commit_deltas, Delta, DeltaSet};
pub use simulation::impact::{lifetime_impact, simulation_impact, LifetimeImpact};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
