//! Process logging bootstrap.
//!
//! # Responsibility
//! - Start file-based rolling logs once per process.
//! - Resolve logging settings from the host environment.
//! - Record panics (including fatal startup wiring) before the process dies.
//!
//! # Invariants
//! - Initialization with an identical config is idempotent.
//! - Re-initialization with a different level or directory is rejected.
//! - Initialization never panics.

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::{error, info, LevelFilter};
use once_cell::sync::OnceCell;
use std::panic::PanicHookInfo;
use std::path::{Path, PathBuf};

/// Environment variable holding the absolute log directory.
pub const LOG_DIR_ENV: &str = "NUCLEUS_LOG_DIR";
/// Environment variable holding the log level.
pub const LOG_LEVEL_ENV: &str = "NUCLEUS_LOG_LEVEL";

const LOG_FILE_BASENAME: &str = "nucleus";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
const MAX_LOG_FILES: usize = 5;
const MAX_PANIC_PAYLOAD_CHARS: usize = 160;

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();
static PANIC_HOOK: OnceCell<()> = OnceCell::new();

struct LoggingState {
    config: LoggingConfig,
    _logger: LoggerHandle,
}

/// Normalized logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: LevelFilter,
    pub log_dir: PathBuf,
}

impl LoggingConfig {
    /// Normalizes a raw level and directory.
    ///
    /// # Errors
    /// - Unsupported level (`off` included).
    /// - Empty or relative directory.
    pub fn new(level: &str, log_dir: &str) -> Result<Self, String> {
        Ok(Self {
            level: parse_level(level)?,
            log_dir: parse_log_dir(log_dir)?,
        })
    }

    /// Reads `NUCLEUS_LOG_DIR` / `NUCLEUS_LOG_LEVEL`.
    ///
    /// Returns `Ok(None)` when no log directory is configured.
    pub fn from_env() -> Result<Option<Self>, String> {
        let Ok(log_dir) = std::env::var(LOG_DIR_ENV) else {
            return Ok(None);
        };
        let level_filter = match std::env::var(LOG_LEVEL_ENV) {
            Ok(raw) => parse_level(&raw)?,
            Err(_) => default_log_level(),
        };
        Ok(Some(Self {
            level: level_filter,
            log_dir: parse_log_dir(&log_dir)?,
        }))
    }

    fn level_spec(&self) -> String {
        self.level.as_str().to_ascii_lowercase()
    }
}

/// Starts the file logger for `config`.
///
/// # Errors
/// - Returns an error when logging is already active with another config.
/// - Returns an error when the directory cannot be created or the backend
///   fails to start.
pub fn init_logging(config: &LoggingConfig) -> Result<(), String> {
    let state = LOGGING_STATE.get_or_try_init(|| start_logger(config))?;
    ensure_same_config(&state.config, config)
}

/// `Debug` for debug builds, `Info` for release builds.
pub fn default_log_level() -> LevelFilter {
    if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

fn start_logger(config: &LoggingConfig) -> Result<LoggingState, String> {
    std::fs::create_dir_all(&config.log_dir).map_err(|err| {
        format!(
            "failed to create log directory `{}`: {err}",
            config.log_dir.display()
        )
    })?;

    let spec = config.level_spec();
    let logger = Logger::try_with_str(&spec)
        .map_err(|err| format!("invalid log level `{spec}`: {err}"))?
        .log_to_file(
            FileSpec::default()
                .directory(config.log_dir.as_path())
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| format!("failed to start logger: {err}"))?;

    PANIC_HOOK.get_or_init(install_panic_hook);

    info!(
        "event=logging_init module=logging status=ok level={spec} log_dir={} version={}",
        config.log_dir.display(),
        env!("CARGO_PKG_VERSION")
    );

    Ok(LoggingState {
        config: config.clone(),
        _logger: logger,
    })
}

fn ensure_same_config(active: &LoggingConfig, requested: &LoggingConfig) -> Result<(), String> {
    if active.log_dir != requested.log_dir {
        return Err(format!(
            "logging already initialized at `{}`; refusing to switch to `{}`",
            active.log_dir.display(),
            requested.log_dir.display()
        ));
    }
    if active.level != requested.level {
        return Err(format!(
            "logging already initialized with level `{}`; refusing to switch to `{}`",
            active.level_spec(),
            requested.level_spec()
        ));
    }
    Ok(())
}

fn parse_level(raw: &str) -> Result<LevelFilter, String> {
    let trimmed = raw.trim();
    let candidate = if trimmed.eq_ignore_ascii_case("warning") {
        "warn"
    } else {
        trimmed
    };
    match candidate.parse::<LevelFilter>() {
        Ok(LevelFilter::Off) | Err(_) => Err(format!(
            "unsupported log level `{trimmed}`; expected trace|debug|info|warn|error"
        )),
        Ok(level) => Ok(level),
    }
}

fn parse_log_dir(raw: &str) -> Result<PathBuf, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("log_dir cannot be empty".to_string());
    }
    let path = Path::new(trimmed);
    if !path.is_absolute() {
        return Err(format!("log_dir must be an absolute path, got `{trimmed}`"));
    }
    Ok(path.to_path_buf())
}

fn install_panic_hook() {
    let previous_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let location = panic_info
            .location()
            .map_or_else(|| "unknown".to_string(), |loc| format!("{}:{}", loc.file(), loc.line()));
        error!(
            "event=panic_captured module=logging status=error location={location} payload={}",
            single_line(&panic_payload(panic_info), MAX_PANIC_PAYLOAD_CHARS)
        );
        previous_hook(panic_info);
    }));
}

fn panic_payload(info: &PanicHookInfo<'_>) -> String {
    let payload = info.payload();
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string())
}

// Payloads may carry nucleus source text; keep log lines single-line and short.
fn single_line(value: &str, max_chars: usize) -> String {
    let mut line: String = value
        .chars()
        .take(max_chars)
        .map(|c| if matches!(c, '\n' | '\r') { ' ' } else { c })
        .collect();
    if value.chars().nth(max_chars).is_some() {
        line.push_str("...");
    }
    line
}
