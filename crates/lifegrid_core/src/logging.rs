//! Process-wide logging for LifeGrid.
//!
//! # Responsibility
//! - Route `log` events to one size-rotated `lifegrid` file per process.
//! - Record which stores a session opened with (`session_start`).
//! - Turn panics into one-line `panic_captured` events.
//!
//! # Invariants
//! - The first successful `init_logging` fixes level and directory; later
//!   calls must repeat them exactly.
//! - Event lines carry metadata only; task text, notes, profile values and
//!   user ids stay out of the log.

use crate::service::session::{Session, StoreStatus};
use flexi_logger::{
    Cleanup, Criterion, DeferredNow, FileSpec, Logger, LoggerHandle, Naming, WriteMode,
};
use log::{error, info, LevelFilter, Record};
use once_cell::sync::OnceCell;
use std::any::Any;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Once;

const LOG_BASENAME: &str = "lifegrid";
const ROTATE_AT_BYTES: u64 = 10 * 1024 * 1024;
const KEEP_ROTATED_FILES: usize = 5;
const PANIC_SUMMARY_CHARS: usize = 160;
const LINE_TIMESTAMP: &str = "%Y-%m-%d %H:%M:%S%.3f";

static ACTIVE: OnceCell<ActiveLogger> = OnceCell::new();
static PANIC_HOOK: Once = Once::new();

/// Validated file-logger settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub level: LevelFilter,
    pub dir: PathBuf,
}

impl LogConfig {
    /// Parses shell-supplied settings.
    ///
    /// A blank level means [`default_log_level`]; `warning` is accepted for
    /// `warn`. `off` is rejected because it would leave an empty log file.
    pub fn parse(level: &str, log_dir: &str) -> Result<Self, String> {
        Ok(Self {
            level: parse_level(level)?,
            dir: parse_dir(log_dir)?,
        })
    }
}

struct ActiveLogger {
    config: LogConfig,
    _handle: LoggerHandle,
}

/// Starts the file logger, or confirms the running one has the same settings.
///
/// Never panics; every failure comes back as a readable message.
pub fn init_logging(level: &str, log_dir: &str) -> Result<(), String> {
    let requested = LogConfig::parse(level, log_dir)?;
    let active = ACTIVE.get_or_try_init(|| start_logger(&requested))?;
    if active.config == requested {
        return Ok(());
    }
    Err(format!(
        "logging already running with level={} dir=`{}`; refusing level={} dir=`{}`",
        active.config.level,
        active.config.dir.display(),
        requested.level,
        requested.dir.display()
    ))
}

/// Settings of the running logger, `None` before `init_logging` succeeds.
pub fn logging_status() -> Option<LogConfig> {
    ACTIVE.get().map(|active| active.config.clone())
}

/// `Debug` for debug builds, `Info` otherwise.
pub fn default_log_level() -> LevelFilter {
    if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Logs the session mode and the load status of each named store.
pub fn log_session_start(session: &Session, stores: &[(&str, StoreStatus)]) {
    info!("{}", session_start_line(session, stores));
}

fn session_start_line(session: &Session, stores: &[(&str, StoreStatus)]) -> String {
    let degraded = stores.iter().any(|(_, status)| status.is_error());
    let mut line = format!(
        "event=session_start module=core status={} mode={}",
        if degraded { "degraded" } else { "ok" },
        session.mode()
    );
    for (store, status) in stores {
        line.push_str(&format!(" {store}={}", status.code()));
    }
    line
}

fn start_logger(config: &LogConfig) -> Result<ActiveLogger, String> {
    std::fs::create_dir_all(&config.dir).map_err(|err| {
        format!(
            "cannot create log directory `{}`: {err}",
            config.dir.display()
        )
    })?;

    let handle = Logger::with(config.level)
        .log_to_file(
            FileSpec::default()
                .directory(config.dir.clone())
                .basename(LOG_BASENAME),
        )
        .rotate(
            Criterion::Size(ROTATE_AT_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(KEEP_ROTATED_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(event_line_format)
        .start()
        .map_err(|err| format!("failed to start logger: {err}"))?;

    PANIC_HOOK.call_once(install_panic_hook);
    info!(
        "event=logging_init module=core status=ok os={} debug_build={} version={} level={} dir={}",
        std::env::consts::OS,
        cfg!(debug_assertions),
        env!("CARGO_PKG_VERSION"),
        config.level,
        config.dir.display()
    );

    Ok(ActiveLogger {
        config: config.clone(),
        _handle: handle,
    })
}

fn parse_level(raw: &str) -> Result<LevelFilter, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(default_log_level());
    }
    let level = if trimmed.eq_ignore_ascii_case("warning") {
        LevelFilter::Warn
    } else {
        LevelFilter::from_str(trimmed).map_err(|_| {
            format!("unsupported log level `{trimmed}`; expected trace|debug|info|warn|error")
        })?
    };
    if level == LevelFilter::Off {
        return Err("log level `off` is not allowed for the file log".to_string());
    }
    Ok(level)
}

fn parse_dir(raw: &str) -> Result<PathBuf, String> {
    let path = Path::new(raw.trim());
    if path.as_os_str().is_empty() {
        return Err("log_dir cannot be empty".to_string());
    }
    if !path.is_absolute() {
        return Err(format!(
            "log_dir must be an absolute path, got `{}`",
            path.display()
        ));
    }
    Ok(path.to_path_buf())
}

/// `2026-03-18 09:30:00.125 INFO  lifegrid_core::db::open event=db_open ...`
fn event_line_format(
    w: &mut dyn Write,
    now: &mut DeferredNow,
    record: &Record,
) -> std::io::Result<()> {
    write!(
        w,
        "{} {:<5} {} {}",
        now.format(LINE_TIMESTAMP),
        record.level(),
        record.target(),
        record.args()
    )
}

fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let location = info.location().map_or_else(
            || "unknown".to_string(),
            |loc| format!("{}:{}", loc.file(), loc.line()),
        );
        error!(
            "event=panic_captured module=core status=error location={} payload={}",
            location,
            panic_summary(info.payload())
        );
        previous(info);
    }));
}

/// Single-line, length-capped rendering of a panic payload, which may echo
/// user text.
fn panic_summary(payload: &(dyn Any + Send)) -> String {
    let text = payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload");
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    match collapsed.char_indices().nth(PANIC_SUMMARY_CHARS) {
        Some((cut, _)) => format!("{}...", &collapsed[..cut]),
        None => collapsed,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        default_log_level, event_line_format, init_logging, logging_status, panic_summary,
        session_start_line, LogConfig, PANIC_SUMMARY_CHARS,
    };
    use crate::service::session::{Session, StoreStatus};
    use flexi_logger::DeferredNow;
    use log::{Level, LevelFilter, Record};
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_temp_dir(suffix: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time should be after unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "lifegrid-logging-{suffix}-{}-{nanos}",
            std::process::id()
        ))
    }

    #[test]
    fn config_parses_levels_and_aliases() {
        let dir = unique_temp_dir("parse");
        let dir_str = dir.to_str().expect("temp dir should be valid UTF-8");

        let config = LogConfig::parse(" WARNING ", dir_str).expect("warning is an alias");
        assert_eq!(config.level, LevelFilter::Warn);
        assert_eq!(config.dir, dir);
        assert_eq!(
            LogConfig::parse("", dir_str).unwrap().level,
            default_log_level()
        );
        assert_eq!(
            LogConfig::parse("Trace", dir_str).unwrap().level,
            LevelFilter::Trace
        );
    }

    #[test]
    fn config_rejects_off_unknown_and_relative() {
        let dir = unique_temp_dir("reject");
        let dir_str = dir.to_str().expect("temp dir should be valid UTF-8");

        assert!(LogConfig::parse("off", dir_str).is_err());
        let error = LogConfig::parse("verbose", dir_str).expect_err("unknown level");
        assert!(error.contains("verbose"));
        let error = LogConfig::parse("info", "logs/dev").expect_err("relative dir");
        assert!(error.contains("absolute"));
        assert!(LogConfig::parse("info", "  ").is_err());
    }

    #[test]
    fn session_start_line_lists_store_statuses() {
        let line = session_start_line(
            &Session::authenticated("user-42"),
            &[
                ("calendar", StoreStatus::Loaded),
                ("profile", StoreStatus::ErrorLoading),
            ],
        );
        assert_eq!(
            line,
            "event=session_start module=core status=degraded mode=remote calendar=loaded profile=error_loading"
        );
        assert!(!line.contains("user-42"));

        let line = session_start_line(&Session::Anonymous, &[("notes", StoreStatus::Loaded)]);
        assert!(line.contains("status=ok mode=local notes=loaded"));
    }

    #[test]
    fn file_lines_carry_timestamp_level_and_target() {
        let mut out = Vec::new();
        event_line_format(
            &mut out,
            &mut DeferredNow::new(),
            &Record::builder()
                .args(format_args!("event=db_open module=db status=ok"))
                .level(Level::Warn)
                .target("lifegrid_core::db")
                .build(),
        )
        .unwrap();

        let line = String::from_utf8(out).unwrap();
        assert!(line.ends_with(" WARN  lifegrid_core::db event=db_open module=db status=ok"));
        // `YYYY-MM-DD HH:MM:SS.mmm`
        assert_eq!(line.find(" WARN"), Some(23));
    }

    #[test]
    fn panic_summary_is_single_line_and_capped() {
        let summary = panic_summary(&"boom\n  at\r\nline 3");
        assert_eq!(summary, "boom at line 3");

        let long = "é".repeat(PANIC_SUMMARY_CHARS + 5);
        let summary = panic_summary(&long);
        assert_eq!(summary.chars().count(), PANIC_SUMMARY_CHARS + 3);
        assert!(summary.ends_with("..."));

        assert_eq!(panic_summary(&42_u8), "non-string panic payload");
    }

    #[test]
    fn init_logging_is_idempotent_for_same_config_and_rejects_conflicts() {
        let log_dir = unique_temp_dir("idempotent");
        let log_dir_str = log_dir
            .to_str()
            .expect("temp dir should be valid UTF-8")
            .to_string();
        let second_dir = unique_temp_dir("different");
        let second_dir_str = second_dir
            .to_str()
            .expect("temp dir should be valid UTF-8")
            .to_string();

        init_logging("info", &log_dir_str).expect("first init should succeed");
        init_logging(" INFO ", &log_dir_str).expect("same config should be idempotent");

        let level_error =
            init_logging("debug", &log_dir_str).expect_err("level conflict should fail");
        assert!(level_error.contains("refusing"));

        let dir_error =
            init_logging("info", &second_dir_str).expect_err("directory conflict should fail");
        assert!(dir_error.contains("refusing"));

        let active = logging_status().expect("logging should be active");
        assert_eq!(active.level, LevelFilter::Info);
        assert_eq!(active.dir, log_dir);
    }
}
