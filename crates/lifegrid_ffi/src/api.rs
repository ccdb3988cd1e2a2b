//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose calendar, search, simulation and reminder use cases to Dart via FRB.
//! - Translate core results into flat envelopes the UI can render directly.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - DB-backed calls are serialized; each one reads, mutates and persists
//!   whole-state blobs without interleaving.
//! - A write call whose blob save failed reports `ok=false` with the
//!   store's `Error saving` status.
//! - Dates cross the boundary as `YYYY-MM-DD`, local instants as
//!   `YYYY-MM-DDTHH:MM`.

use chrono::{Local, NaiveDate, NaiveDateTime};
use lifegrid_core::db::open_db;
use lifegrid_core::model::calendar::TaskKind;
use lifegrid_core::{
    apply_deltas, core_version as core_version_inner, export_deltas_ics,
    init_logging as init_logging_inner, log_session_start, ping as ping_inner, search_calendar,
    simulation_impact, BlobRepository, CalendarService, CategoryName, DailyTask, DeltaSet,
    NotesService, Notification, ProfileService, ReminderScanner, SearchHit, Session,
    SqliteBlobRepository, SqliteUserRowRepository, StoreStatus, TaskId, MINUTES_PER_DAY,
};
use log::warn;
use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

const DB_FILE_NAME: &str = "lifegrid.sqlite3";
const DATE_FORMAT: &str = "%Y-%m-%d";
const LOCAL_INSTANT_FORMAT: &str = "%Y-%m-%dT%H:%M";
static DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static DB_LOCK: Mutex<()> = Mutex::new(());

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// `level` is one of `trace|debug|info|warn|error`, blank for the build's
/// default; `log_dir` must be an absolute directory.
///
/// # FFI contract
/// - Idempotent for the same `level + log_dir`; conflicting calls fail.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Load status of one persisted store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreStatusItem {
    /// `calendar|profile|notes`.
    pub store: String,
    /// Indicator text: `Loaded`, `Error loading`, ...
    pub status: String,
}

/// Session bootstrap envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStatusResponse {
    pub ok: bool,
    /// `local` or `remote`.
    pub mode: String,
    pub stores: Vec<StoreStatusItem>,
    pub message: String,
}

/// One task or event of a calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarTaskItem {
    pub task_id: String,
    pub text: String,
    /// `task` or `event`.
    pub kind: String,
    pub completed: bool,
    pub reminder: Option<String>,
}

/// Day read envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarDayResponse {
    pub ok: bool,
    pub title: String,
    pub tasks: Vec<CalendarTaskItem>,
    pub message: String,
}

/// Generic action response envelope for calendar writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarActionResponse {
    pub ok: bool,
    /// Affected task id when the action targets one task.
    pub task_id: Option<String>,
    pub message: String,
}

impl CalendarActionResponse {
    fn success(message: impl Into<String>, task_id: String) -> Self {
        Self {
            ok: true,
            task_id: Some(task_id),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            task_id: None,
            message: message.into(),
        }
    }
}

/// Ranked search hit with navigation coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarSearchItem {
    /// `year|month|week|day|goal`.
    pub kind: String,
    pub title: String,
    pub year: i32,
    pub month: Option<u32>,
    pub week: Option<u32>,
    pub day_of_week: Option<u32>,
    pub task_id: Option<String>,
    pub date: Option<String>,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalendarSearchResponse {
    pub items: Vec<CalendarSearchItem>,
    pub message: String,
}

/// Simulated change for one category, keyed by display label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationDeltaInput {
    pub category: String,
    pub delta_minutes: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationItem {
    pub category: String,
    pub minutes_per_day: i64,
}

/// Modified allocation plus lifetime impact of the whole delta set.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResponse {
    pub ok: bool,
    pub allocations: Vec<AllocationItem>,
    pub total_delta_minutes: i64,
    pub annual_hours_changed: f64,
    pub lifetime_days_changed: f64,
    pub lifetime_years_changed: f64,
    /// `Gained|Lost|Unchanged`.
    pub direction: String,
    pub message: String,
}

impl SimulationResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            allocations: Vec::new(),
            total_delta_minutes: 0,
            annual_hours_changed: 0.0,
            lifetime_days_changed: 0.0,
            lifetime_years_changed: 0.0,
            direction: String::new(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderNotificationItem {
    pub id: i64,
    pub title: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderScanResponse {
    pub ok: bool,
    pub notifications: Vec<ReminderNotificationItem>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportResponse {
    pub ok: bool,
    pub document: String,
    pub message: String,
}

/// Loads every store for the session and logs a `session_start` event.
///
/// `user_id` routes profile and notes to per-user rows; `None` uses local
/// blobs. `ok=false` when any store failed to load.
#[flutter_rust_bridge::frb(sync)]
pub fn session_status(user_id: Option<String>) -> SessionStatusResponse {
    let session = session_for(user_id);
    let result = with_connection(|conn| {
        let calendar = load_calendar(conn)?;
        let profile = ProfileService::load(blob_repo(conn)?, user_rows(conn)?, session.clone());
        let notes = NotesService::load(blob_repo(conn)?, user_rows(conn)?, session.clone());
        Ok([
            ("calendar", calendar.status()),
            ("profile", profile.status()),
            ("notes", notes.status()),
        ])
    });
    match result {
        Ok(stores) => {
            log_session_start(&session, &stores);
            SessionStatusResponse {
                ok: !stores.iter().any(|(_, status)| status.is_error()),
                mode: session.mode().to_string(),
                stores: stores
                    .iter()
                    .map(|(store, status)| StoreStatusItem {
                        store: (*store).to_string(),
                        status: status.to_string(),
                    })
                    .collect(),
                message: String::new(),
            }
        }
        Err(err) => SessionStatusResponse {
            ok: false,
            mode: session.mode().to_string(),
            stores: Vec::new(),
            message: format!("session_status failed: {err}"),
        },
    }
}

/// Reads one calendar day.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Missing days return `ok=true` with an empty record.
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_day_get(date: String) -> CalendarDayResponse {
    let result = parse_date(&date).and_then(|day| {
        with_connection(|conn| {
            let calendar = load_calendar(conn)?;
            Ok(calendar.get_day_data(&day))
        })
    });
    match result {
        Ok(record) => CalendarDayResponse {
            ok: true,
            tasks: record.goals.iter().map(to_task_item).collect(),
            title: record.title,
            message: String::new(),
        },
        Err(err) => CalendarDayResponse {
            ok: false,
            title: String::new(),
            tasks: Vec::new(),
            message: format!("calendar_day_get failed: {err}"),
        },
    }
}

/// Appends a task or event to a calendar day.
///
/// `kind` is `task` or `event`; `reminder` is an optional `HH:MM`.
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_add_task(
    date: String,
    text: String,
    kind: String,
    reminder: Option<String>,
) -> CalendarActionResponse {
    let result = parse_date(&date).and_then(|day| {
        let kind = parse_task_kind(&kind)?;
        let mut task = DailyTask::new(kind, text.trim());
        task.reminder = reminder.filter(|value| !value.trim().is_empty());
        with_connection(|conn| add_task_in(blob_repo(conn)?, &day, task))
    });
    match result {
        Ok(task_id) => CalendarActionResponse::success("Task added.", task_id.to_string()),
        Err(err) => CalendarActionResponse::failure(format!("calendar_add_task failed: {err}")),
    }
}

/// Toggles completion of one task.
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_set_task_completed(
    date: String,
    task_id: String,
    completed: bool,
) -> CalendarActionResponse {
    let result = parse_date(&date).and_then(|day| {
        let id = uuid::Uuid::parse_str(task_id.trim())
            .map_err(|err| format!("invalid task id `{task_id}`: {err}"))?;
        with_connection(|conn| set_completed_in(blob_repo(conn)?, &day, id, completed))
    });
    match result {
        Ok(id) => CalendarActionResponse::success("Task updated.", id.to_string()),
        Err(err) => {
            CalendarActionResponse::failure(format!("calendar_set_task_completed failed: {err}"))
        }
    }
}

/// Searches the calendar relative to the local clock.
///
/// The literal query `events` lists upcoming events instead.
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_search(query: String) -> CalendarSearchResponse {
    let now = Local::now().naive_local();
    let result = with_connection(|conn| {
        let calendar = load_calendar(conn)?;
        Ok(search_calendar(calendar.store(), &query, now))
    });
    match result {
        Ok(hits) => {
            let items = hits.into_iter().map(to_search_item).collect::<Vec<_>>();
            let message = if items.is_empty() {
                "No results.".to_string()
            } else {
                format!("Found {} result(s).", items.len())
            };
            CalendarSearchResponse { items, message }
        }
        Err(err) => CalendarSearchResponse {
            items: Vec::new(),
            message: format!("calendar_search failed: {err}"),
        },
    }
}

/// Applies `deltas` to the stored profile without committing them.
///
/// `user_id` selects the per-user profile row; `None` uses the local profile.
#[flutter_rust_bridge::frb(sync)]
pub fn simulate(user_id: Option<String>, deltas: Vec<SimulationDeltaInput>) -> SimulationResponse {
    let result = parse_deltas(&deltas).and_then(|delta_set| {
        with_connection(|conn| {
            let profiles =
                ProfileService::load(blob_repo(conn)?, user_rows(conn)?, session_for(user_id));
            let profile = profiles.profile();
            Ok((
                apply_deltas(&profile.activities, &delta_set),
                simulation_impact(profile, &delta_set),
            ))
        })
    });
    match result {
        Ok((allocations, impact)) => SimulationResponse {
            ok: true,
            allocations: allocations
                .into_iter()
                .map(|activity| AllocationItem {
                    category: activity.name.label().to_string(),
                    minutes_per_day: activity.minutes_per_day,
                })
                .collect(),
            total_delta_minutes: impact.total_delta_minutes,
            annual_hours_changed: impact.annual_hours_changed,
            lifetime_days_changed: impact.lifetime_days_changed,
            lifetime_years_changed: impact.lifetime_years_changed,
            direction: impact.direction.label().to_string(),
            message: String::new(),
        },
        Err(err) => SimulationResponse::failure(format!("simulate failed: {err}")),
    }
}

/// Runs one reminder scan against the local clock.
///
/// The fired-set is persisted, so repeated calls never re-fire a reminder.
#[flutter_rust_bridge::frb(sync)]
pub fn reminder_scan() -> ReminderScanResponse {
    let now = Local::now().naive_local();
    let result = with_connection(|conn| {
        Ok(scan_in(blob_repo(conn)?, blob_repo(conn)?, now))
    });
    match result {
        Ok((fired, status)) => to_scan_response(fired, status),
        Err(err) => ReminderScanResponse {
            ok: false,
            notifications: Vec::new(),
            message: format!("reminder_scan failed: {err}"),
        },
    }
}

/// Renders `deltas` as an iCalendar document starting at `start`.
#[flutter_rust_bridge::frb(sync)]
pub fn export_simulation_ics(deltas: Vec<SimulationDeltaInput>, start: String) -> ExportResponse {
    let result = parse_deltas(&deltas).and_then(|delta_set| {
        let start = NaiveDateTime::parse_from_str(start.trim(), LOCAL_INSTANT_FORMAT)
            .map_err(|err| format!("invalid start `{start}`: {err}"))?;
        Ok(export_deltas_ics(
            &delta_set,
            start,
            Local::now().naive_local(),
        ))
    });
    match result {
        Ok(document) => ExportResponse {
            ok: true,
            document,
            message: String::new(),
        },
        Err(err) => ExportResponse {
            ok: false,
            document: String::new(),
            message: format!("export_simulation_ics failed: {err}"),
        },
    }
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("LIFEGRID_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DB_FILE_NAME)
        })
        .clone()
}

fn with_connection<T>(f: impl FnOnce(&Connection) -> Result<T, String>) -> Result<T, String> {
    let _guard = DB_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let conn = open_db(resolve_db_path()).map_err(|err| {
        warn!("event=ffi_db_open module=ffi status=error error={err}");
        format!("DB open failed: {err}")
    })?;
    f(&conn)
}

fn blob_repo(conn: &Connection) -> Result<SqliteBlobRepository<'_>, String> {
    SqliteBlobRepository::try_new(conn).map_err(|err| err.to_string())
}

fn user_rows(conn: &Connection) -> Result<SqliteUserRowRepository<'_>, String> {
    SqliteUserRowRepository::try_new(conn).map_err(|err| err.to_string())
}

fn load_calendar(conn: &Connection) -> Result<CalendarService<SqliteBlobRepository<'_>>, String> {
    Ok(CalendarService::load(blob_repo(conn)?))
}

/// Maps a failed blob write to the status label the UI indicator shows.
fn ensure_saved(status: StoreStatus) -> Result<(), String> {
    match status {
        StoreStatus::ErrorSaving => Err(status.to_string()),
        _ => Ok(()),
    }
}

fn add_task_in<B: BlobRepository>(
    blobs: B,
    day: &NaiveDate,
    task: DailyTask,
) -> Result<TaskId, String> {
    let mut calendar = CalendarService::load(blobs);
    let id = calendar
        .add_task_to_day(day, task)
        .map_err(|err| err.to_string())?;
    ensure_saved(calendar.status())?;
    Ok(id)
}

fn set_completed_in<B: BlobRepository>(
    blobs: B,
    day: &NaiveDate,
    id: TaskId,
    completed: bool,
) -> Result<TaskId, String> {
    let mut calendar = CalendarService::load(blobs);
    if !calendar.set_task_completed(day, id, completed) {
        return Err(format!("task `{id}` not found on {day}"));
    }
    ensure_saved(calendar.status())?;
    Ok(id)
}

fn scan_in<C: BlobRepository, R: BlobRepository>(
    calendar: C,
    fired_set: R,
    now: NaiveDateTime,
) -> (Vec<Notification>, StoreStatus) {
    let calendar = CalendarService::load(calendar);
    let mut scanner = ReminderScanner::start(fired_set);
    let fired = scanner.scan(calendar.store(), now);
    scanner.stop();
    (fired, scanner.status())
}

fn session_for(user_id: Option<String>) -> Session {
    match user_id.filter(|value| !value.trim().is_empty()) {
        Some(user_id) => Session::authenticated(user_id),
        None => Session::Anonymous,
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|err| format!("invalid date `{value}`: {err}"))
}

fn parse_task_kind(value: &str) -> Result<TaskKind, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "task" => Ok(TaskKind::Task),
        "event" => Ok(TaskKind::Event),
        other => Err(format!("unsupported task kind `{other}`; expected task|event")),
    }
}

fn parse_deltas(inputs: &[SimulationDeltaInput]) -> Result<DeltaSet, String> {
    let mut deltas = DeltaSet::new();
    for input in inputs {
        let name = CategoryName::parse(&input.category)
            .ok_or_else(|| format!("unknown category `{}`", input.category))?;
        // A day never gains or loses more than its own length.
        if input.delta_minutes.unsigned_abs() > MINUTES_PER_DAY.unsigned_abs() {
            return Err(format!(
                "delta for `{}` out of range: {} (limit ±{MINUTES_PER_DAY})",
                input.category, input.delta_minutes
            ));
        }
        deltas.set(name, input.delta_minutes);
    }
    Ok(deltas)
}

/// Fired notifications are always listed; an unsaved fired-set fails the
/// envelope because those reminders will fire again.
fn to_scan_response(fired: Vec<Notification>, status: StoreStatus) -> ReminderScanResponse {
    let count = fired.len();
    let (ok, message) = match ensure_saved(status) {
        Ok(()) => (true, format!("{count} reminder(s) fired.")),
        Err(err) => (false, format!("{count} reminder(s) fired; fired-set not stored: {err}")),
    };
    ReminderScanResponse {
        ok,
        notifications: fired
            .into_iter()
            .map(|notification| ReminderNotificationItem {
                id: notification.id,
                title: notification.title,
                message: notification.message,
            })
            .collect(),
        message,
    }
}

fn to_task_item(task: &DailyTask) -> CalendarTaskItem {
    CalendarTaskItem {
        task_id: task.id.to_string(),
        text: task.text.clone(),
        kind: match task.kind {
            TaskKind::Task => "task",
            TaskKind::Event => "event",
        }
        .to_string(),
        completed: task.completed,
        reminder: task.reminder.clone(),
    }
}

fn to_search_item(hit: SearchHit) -> CalendarSearchItem {
    CalendarSearchItem {
        kind: hit.kind.label().to_string(),
        title: hit.title,
        year: hit.year,
        month: hit.month,
        week: hit.week,
        day_of_week: hit.day_of_week,
        task_id: hit.task_id.map(|id| id.to_string()),
        date: hit.date.map(|date| date.format(DATE_FORMAT).to_string()),
        score: hit.score,
    }
}
