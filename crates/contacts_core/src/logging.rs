//! Process-wide logger setup.
//!
//! # Responsibility
//! - Start the `flexi_logger` backend once, writing rotating files under a
//!   directory or plain lines to stderr.
//! - Capture panics as a single flattened, length-capped log line.
//!
//! # Invariants
//! - Repeating `init_logging` with the same level and target is a no-op.
//! - A different level or target after the first call is an error, never a
//!   silent reconfiguration.
//! - Nothing in this module panics.

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::{error, info, LevelFilter};
use once_cell::sync::OnceCell;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::sync::Once;

const LOG_FILE_BASENAME: &str = "contacts";
const ROTATE_AT_BYTES: u64 = 10 * 1024 * 1024;
const KEEP_ROTATED_FILES: usize = 5;
const PANIC_PAYLOAD_LIMIT: usize = 160;

static ACTIVE: OnceCell<ActiveLogger> = OnceCell::new();
static PANIC_HOOK: Once = Once::new();

/// Where log lines go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    /// Rotating `contacts*.log` files in this absolute directory.
    Directory(PathBuf),
}

impl LogTarget {
    fn from_option(log_dir: Option<&str>) -> Result<Self, String> {
        let Some(raw) = log_dir else {
            return Ok(Self::Stderr);
        };
        let raw = raw.trim();
        if raw.is_empty() {
            return Err("log directory must not be blank".to_string());
        }
        let dir = Path::new(raw);
        if !dir.is_absolute() {
            return Err(format!("log directory `{raw}` is not an absolute path"));
        }
        Ok(Self::Directory(dir.to_path_buf()))
    }
}

impl Display for LogTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stderr => write!(f, "stderr"),
            Self::Directory(dir) => write!(f, "{}", dir.display()),
        }
    }
}

/// Level and target of the running logger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingStatus {
    pub level: &'static str,
    pub target: LogTarget,
}

struct ActiveLogger {
    status: LoggingStatus,
    _handle: LoggerHandle,
}

/// Starts process logging.
///
/// `log_dir = None` writes to stderr; `Some(dir)` writes rotating files
/// under `dir`, which must be absolute and is created when missing.
///
/// # Errors
/// Returns a message when the level or directory is invalid, when the
/// backend fails to start, or when logging already runs with a different
/// level or target.
pub fn init_logging(level: &str, log_dir: Option<&str>) -> Result<(), String> {
    let requested = LoggingStatus {
        level: parse_level(level)?,
        target: LogTarget::from_option(log_dir)?,
    };

    let active = ACTIVE.get_or_try_init(|| start(&requested))?;
    if active.status != requested {
        return Err(format!(
            "logging already active as {}@{}; cannot switch to {}@{}",
            active.status.level, active.status.target, requested.level, requested.target
        ));
    }
    Ok(())
}

/// Running logger configuration, or `None` before [`init_logging`].
pub fn logging_status() -> Option<LoggingStatus> {
    ACTIVE.get().map(|active| active.status.clone())
}

/// `debug` for debug builds, `info` for release builds.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn start(status: &LoggingStatus) -> Result<ActiveLogger, String> {
    let logger = Logger::try_with_str(status.level)
        .map_err(|err| format!("bad log level `{}`: {err}", status.level))?;

    let logger = match &status.target {
        LogTarget::Stderr => logger
            .log_to_stderr()
            .format_for_stderr(flexi_logger::detailed_format),
        LogTarget::Directory(dir) => {
            std::fs::create_dir_all(dir)
                .map_err(|err| format!("cannot create `{}`: {err}", dir.display()))?;
            logger
                .log_to_file(FileSpec::default().directory(dir).basename(LOG_FILE_BASENAME))
                .rotate(
                    Criterion::Size(ROTATE_AT_BYTES),
                    Naming::Numbers,
                    Cleanup::KeepLogFiles(KEEP_ROTATED_FILES),
                )
                .append()
                .write_mode(WriteMode::BufferAndFlush)
                .format_for_files(flexi_logger::detailed_format)
        }
    };
    let handle = logger
        .start()
        .map_err(|err| format!("logger backend did not start: {err}"))?;

    PANIC_HOOK.call_once(install_panic_hook);
    info!(
        "event=logging_init module=core status=ok level={} target={} os={} version={}",
        status.level,
        status.target,
        std::env::consts::OS,
        env!("CARGO_PKG_VERSION")
    );

    Ok(ActiveLogger {
        status: status.clone(),
        _handle: handle,
    })
}

fn parse_level(raw: &str) -> Result<&'static str, String> {
    let trimmed = raw.trim();
    let filter = if trimmed.eq_ignore_ascii_case("warning") {
        LevelFilter::Warn
    } else {
        trimmed
            .parse::<LevelFilter>()
            .map_err(|_| format!("unknown log level `{trimmed}`"))?
    };
    match filter {
        LevelFilter::Off => Err("log level `off` is not supported".to_string()),
        LevelFilter::Error => Ok("error"),
        LevelFilter::Warn => Ok("warn"),
        LevelFilter::Info => Ok("info"),
        LevelFilter::Debug => Ok("debug"),
        LevelFilter::Trace => Ok("trace"),
    }
}

fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let location = info
            .location()
            .map_or_else(|| "unknown".to_string(), |loc| format!("{}:{}", loc.file(), loc.line()));
        let payload: &str = if let Some(text) = info.payload().downcast_ref::<&str>() {
            *text
        } else if let Some(text) = info.payload().downcast_ref::<String>() {
            text.as_str()
        } else {
            "<non-string payload>"
        };
        error!(
            "event=panic module=core status=error location={location} payload={}",
            single_line(payload, PANIC_PAYLOAD_LIMIT)
        );
        previous(info);
    }));
}

/// Joins lines with spaces and caps the result at `limit` characters.
fn single_line(text: &str, limit: usize) -> String {
    let mut out = String::with_capacity(text.len().min(limit) + 3);
    for (count, ch) in text.chars().enumerate() {
        if count == limit {
            out.push_str("...");
            break;
        }
        out.push(if ch == '\n' || ch == '\r' { ' ' } else { ch });
    }
    out
}
