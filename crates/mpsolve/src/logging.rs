//! Logging setup and diagnostics.

use std::env;
use std::fs::{File, OpenOptions};
use std::io;

use mpsolve_highs::highs_version;
use thiserror::Error;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding the default filter, e.g. `debug` or
/// `mpsolve_highs=trace`.
pub const TRACE_ENV: &str = "MPSOLVE_TRACE";
/// Environment variable selecting `pretty` (default) or `json` output.
pub const FORMAT_ENV: &str = "MPSOLVE_LOG_FORMAT";
/// Environment variable naming a file that receives a copy of every event.
pub const FILE_ENV: &str = "MPSOLVE_LOG_FILE";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("[LOG_FILTER_INVALID] Invalid log filter: {0}")]
    Filter(String),
    #[error("[LOG_FORMAT_INVALID] Invalid MPSOLVE_LOG_FORMAT '{0}' (expected 'json' or 'pretty')")]
    Format(String),
    #[error("[LOG_FILE_UNAVAILABLE] Failed to open log file: {0}")]
    File(#[from] io::Error),
    #[error("[LOG_INIT_FAILED] Failed to initialize logging: {0}")]
    Init(String),
}

impl LoggingError {
    pub fn code(&self) -> &'static str {
        match self {
            LoggingError::Filter(_) => "LOG_FILTER_INVALID",
            LoggingError::Format(_) => "LOG_FORMAT_INVALID",
            LoggingError::File(_) => "LOG_FILE_UNAVAILABLE",
            LoggingError::Init(_) => "LOG_INIT_FAILED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    pub fn parse(value: &str) -> Result<Self, LoggingError> {
        if value.eq_ignore_ascii_case("pretty") {
            Ok(LogFormat::Pretty)
        } else if value.eq_ignore_ascii_case("json") {
            Ok(LogFormat::Json)
        } else {
            Err(LoggingError::Format(value.to_string()))
        }
    }
}

/// Build the event filter for a level or directive string. `off` disables
/// every event.
pub fn build_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    if level.eq_ignore_ascii_case("off") {
        return Ok(EnvFilter::default().add_directive(LevelFilter::OFF.into()));
    }
    EnvFilter::try_new(level).map_err(|err| LoggingError::Filter(err.to_string()))
}

fn open_log_file(path: &str) -> Result<File, LoggingError> {
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}

fn map_init_err<E: std::fmt::Display>(err: E) -> LoggingError {
    LoggingError::Init(err.to_string())
}

/// Install a global `tracing` subscriber writing to stderr.
///
/// When `level` is `None`, [`TRACE_ENV`] is read; if that is unset too, the
/// level is `off`. Returns `false` when a subscriber is already installed.
pub fn init_logging(level: Option<&str>) -> Result<bool, LoggingError> {
    if tracing::dispatcher::has_been_set() {
        return Ok(false);
    }

    let level_value = level
        .map(str::to_string)
        .or_else(|| env::var(TRACE_ENV).ok())
        .unwrap_or_else(|| "off".to_string());
    let filter = build_filter(&level_value)?;
    let format = LogFormat::parse(
        &env::var(FORMAT_ENV).unwrap_or_else(|_| "pretty".to_string()),
    )?;
    let log_file = env::var(FILE_ENV).ok();

    match format {
        LogFormat::Json => {
            let stderr_layer = tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .json();
            let base = tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer);
            if let Some(path) = log_file {
                let file_layer = tracing_subscriber::fmt::layer()
                    .with_writer(open_log_file(&path)?)
                    .with_ansi(false)
                    .json();
                base.with(file_layer).try_init().map_err(map_init_err)?;
            } else {
                base.try_init().map_err(map_init_err)?;
            }
        }
        LogFormat::Pretty => {
            let stderr_layer = tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .pretty();
            let base = tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer);
            if let Some(path) = log_file {
                let file_layer = tracing_subscriber::fmt::layer()
                    .with_writer(open_log_file(&path)?)
                    .with_ansi(false)
                    .pretty();
                base.with(file_layer).try_init().map_err(map_init_err)?;
            } else {
                base.try_init().map_err(map_init_err)?;
            }
        }
    }

    tracing::debug!(
        component = "logging",
        operation = "init",
        status = "success",
        level = level_value.as_str(),
        "Logging initialized"
    );
    Ok(true)
}

/// Engine name and version, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverInfo {
    pub solver: &'static str,
    pub version: Option<String>,
}

pub fn solver_info() -> SolverInfo {
    SolverInfo {
        solver: "HiGHS",
        version: highs_version(),
    }
}
