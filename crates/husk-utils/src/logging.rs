//! # Logging Utilities
//!
//! Logging infrastructure for husk using `tracing`.
//!
//! This module provides structured logging with support for:
//! - Multiple output formats (JSON for machines, pretty for people)
//! - Environment variable configuration
//! - Log level filtering
//! - File and console output
//!
//! Console output always goes to **stderr**. The fixtures own stdout: the
//! countdown's lines are its contract, and the leak/zombie fixture promises
//! to print nothing there.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use husk_utils::init_logging;
//!
//! // Keep the guard alive until exit so file output gets flushed
//! let _guard = init_logging().expect("Failed to initialize logging");
//!
//! tracing::warn!("Shown by default");
//! tracing::debug!("Shown with RUST_LOG=debug");
//! ```
//!
//! ## Environment Variables
//!
//! - `RUST_LOG`: Set log level filter (e.g., `RUST_LOG=debug`, `RUST_LOG=husk_core=trace`)
//! - `HUSK_LOG_FORMAT`: Set output format (`json` or `pretty`, default: `pretty`)
//! - `HUSK_LOG_FILE`: Optional path to log file (if not set, logs only to stderr)

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::{env, io};

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::{self};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Env var selecting the output format
pub const FORMAT_ENV: &str = "HUSK_LOG_FORMAT";

/// Env var naming an optional log file
pub const FILE_ENV: &str = "HUSK_LOG_FILE";

/// Level used when neither `RUST_LOG` nor an explicit level is given
///
/// Fixtures should be silent unless something goes wrong.
pub const DEFAULT_LEVEL: LogLevel = LogLevel::Warn;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat
{
    /// Pretty-printed, human-readable format (default)
    #[default]
    Pretty,
    /// JSON format, one object per line
    Json,
}

impl FromStr for LogFormat
{
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.to_lowercase().as_str() {
            "pretty" | "dev" | "development" => Ok(LogFormat::Pretty),
            "json" | "prod" | "production" => Ok(LogFormat::Json),
            _ => Err(LoggingError::InvalidFormat(format!("{s}. Use 'pretty' or 'json'"))),
        }
    }
}

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel
{
    /// Error level
    Error,
    /// Warning level (default)
    Warn,
    /// Info level
    Info,
    /// Debug level
    Debug,
    /// Trace level (most verbose)
    Trace,
}

impl From<LogLevel> for Level
{
    fn from(level: LogLevel) -> Self
    {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

impl FromStr for LogLevel
{
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.to_lowercase().as_str() {
            "error" | "err" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" | "dbg" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(LoggingError::InvalidLevel(format!(
                "{s}. Use 'error', 'warn', 'info', 'debug', or 'trace'"
            ))),
        }
    }
}

/// Resolved logging configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig
{
    /// Output format for every layer
    pub format: LogFormat,
    /// Level applied when `RUST_LOG` is unset or invalid
    pub default_level: LogLevel,
    /// Also write to this file (daily rolling)
    pub file: Option<PathBuf>,
}

impl Default for LogConfig
{
    fn default() -> Self
    {
        LogConfig {
            format: LogFormat::default(),
            default_level: DEFAULT_LEVEL,
            file: None,
        }
    }
}

impl LogConfig
{
    /// Read `HUSK_LOG_FORMAT` and `HUSK_LOG_FILE`
    ///
    /// An unknown format falls back to pretty; an empty file name means no file.
    pub fn from_env() -> Self
    {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`LogConfig::from_env`] with a custom variable source
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let format = lookup(FORMAT_ENV)
            .and_then(|s| LogFormat::from_str(&s).ok())
            .unwrap_or_default();
        let file = lookup(FILE_ENV).filter(|s| !s.is_empty()).map(PathBuf::from);

        LogConfig {
            format,
            default_level: DEFAULT_LEVEL,
            file,
        }
    }
}

/// Keeps the file writer alive
///
/// Dropping it flushes and stops the background writer, so hold it for the
/// lifetime of `main`.
#[derive(Debug)]
#[must_use = "dropping the guard stops file logging"]
pub struct LoggingGuard
{
    _file: Option<WorkerGuard>,
}

/// Initialize logging with default settings
///
/// Reads configuration from environment variables:
/// - `RUST_LOG`: Log level filter (e.g., `debug`, `husk_core=debug`)
/// - `HUSK_LOG_FORMAT`: Output format (`json` or `pretty`, default: `pretty`)
/// - `HUSK_LOG_FILE`: Optional path to log file
///
/// ## Errors
///
/// Returns an error if:
/// - Logging is already initialized
/// - The log file's directory can't be created
pub fn init_logging() -> Result<LoggingGuard, LoggingError>
{
    init_with_config(&LogConfig::from_env(), None)
}

/// Initialize logging with explicit level and format
///
/// The level wins over `RUST_LOG`. `HUSK_LOG_FILE` is still honoured.
///
/// ## Example
///
/// ```rust,no_run
/// use husk_utils::{init_logging_with_level, LogFormat, LogLevel};
///
/// let _guard = init_logging_with_level(LogLevel::Debug, LogFormat::Json)
///     .expect("Failed to initialize logging");
/// ```
///
/// ## Errors
///
/// Returns an error if logging is already initialized or file logging fails.
pub fn init_logging_with_level(level: LogLevel, format: LogFormat) -> Result<LoggingGuard, LoggingError>
{
    let config = LogConfig {
        format,
        ..LogConfig::from_env()
    };
    init_with_config(&config, Some(level))
}

/// Build the filter
///
/// Priority:
/// 1. An explicit level (from code) takes precedence
/// 2. `RUST_LOG` if set and valid (supports per-module directives)
/// 3. The configured default level
fn build_filter(explicit: Option<LogLevel>, default_level: LogLevel) -> EnvFilter
{
    match explicit {
        Some(level) => EnvFilter::new(Level::from(level).to_string()),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(Level::from(default_level).to_string())),
    }
}

fn console_layer(format: LogFormat, filter: EnvFilter) -> BoxedLayer
{
    match format {
        LogFormat::Pretty => fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_ansi(io::IsTerminal::is_terminal(&io::stderr()))
            .with_writer(io::stderr)
            .with_filter(filter)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_current_span(true)
            .with_span_list(true)
            .with_writer(io::stderr)
            .with_filter(filter)
            .boxed(),
    }
}

fn file_layer(path: &Path, format: LogFormat, filter: EnvFilter) -> Result<(BoxedLayer, WorkerGuard), LoggingError>
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let name = path
        .file_name()
        .ok_or_else(|| LoggingError::InitializationFailed(format!("{} has no file name", path.display())))?;
    std::fs::create_dir_all(&dir)?;

    let file_appender = tracing_appender::rolling::daily(dir, name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let layer = match format {
        LogFormat::Pretty => fmt::layer()
            .with_writer(non_blocking)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_ansi(false) // No ANSI in files
            .with_filter(filter)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(non_blocking)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_current_span(true)
            .with_span_list(true)
            .with_filter(filter)
            .boxed(),
    };
    Ok((layer, guard))
}

fn init_with_config(config: &LogConfig, explicit: Option<LogLevel>) -> Result<LoggingGuard, LoggingError>
{
    let mut layers = vec![console_layer(config.format, build_filter(explicit, config.default_level))];

    let mut file_guard = None;
    if let Some(path) = &config.file {
        let (layer, guard) = file_layer(path, config.format, build_filter(explicit, config.default_level))?;
        layers.push(layer);
        file_guard = Some(guard);
    }

    Registry::default()
        .with(layers)
        .try_init()
        .map_err(|e| LoggingError::InitializationFailed(e.to_string()))?;

    Ok(LoggingGuard { _file: file_guard })
}

/// Logging initialization error
#[derive(Debug, thiserror::Error)]
pub enum LoggingError
{
    /// Invalid log format
    #[error("Invalid log format: {0}")]
    InvalidFormat(String),

    /// Invalid log level
    #[error("Invalid log level: {0}")]
    InvalidLevel(String),

    /// Failed to initialize logging
    #[error("Failed to initialize logging: {0}")]
    InitializationFailed(String),

    /// File logging error
    #[error("File logging error: {0}")]
    FileError(#[from] io::Error),
}

#[cfg(test)]
mod tests
{
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_log_format_from_str()
    {
        assert_eq!(LogFormat::from_str("pretty").unwrap(), LogFormat::Pretty);
        assert_eq!(LogFormat::from_str("JSON").unwrap(), LogFormat::Json);
        assert_eq!(LogFormat::from_str("dev").unwrap(), LogFormat::Pretty);
        assert_eq!(LogFormat::from_str("prod").unwrap(), LogFormat::Json);
        assert!(matches!(LogFormat::from_str("xml"), Err(LoggingError::InvalidFormat(_))));
    }

    #[test]
    fn test_log_level_from_str()
    {
        assert_eq!(LogLevel::from_str("error").unwrap(), LogLevel::Error);
        assert_eq!(LogLevel::from_str("warning").unwrap(), LogLevel::Warn);
        assert_eq!(LogLevel::from_str("info").unwrap(), LogLevel::Info);
        assert_eq!(LogLevel::from_str("dbg").unwrap(), LogLevel::Debug);
        assert_eq!(LogLevel::from_str("trace").unwrap(), LogLevel::Trace);
        assert!(matches!(LogLevel::from_str("loud"), Err(LoggingError::InvalidLevel(_))));
    }

    #[test]
    fn test_log_level_to_tracing_level()
    {
        assert_eq!(Level::from(LogLevel::Error), Level::ERROR);
        assert_eq!(Level::from(LogLevel::Warn), Level::WARN);
        assert_eq!(Level::from(LogLevel::Info), Level::INFO);
        assert_eq!(Level::from(LogLevel::Debug), Level::DEBUG);
        assert_eq!(Level::from(LogLevel::Trace), Level::TRACE);
    }

    #[test]
    fn test_config_defaults_when_unset()
    {
        let config = LogConfig::from_lookup(|_| None);
        assert_eq!(config, LogConfig::default());
        assert_eq!(config.default_level, LogLevel::Warn);
    }

    #[test]
    fn test_config_from_lookup()
    {
        let vars: HashMap<&str, &str> = [(FORMAT_ENV, "json"), (FILE_ENV, "/tmp/husk/fixture.log")].into();
        let config = LogConfig::from_lookup(|key| vars.get(key).map(|v| (*v).to_string()));
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.file, Some(PathBuf::from("/tmp/husk/fixture.log")));
    }

    #[test]
    fn test_config_ignores_bad_values()
    {
        let vars: HashMap<&str, &str> = [(FORMAT_ENV, "yaml"), (FILE_ENV, "")].into();
        let config = LogConfig::from_lookup(|key| vars.get(key).map(|v| (*v).to_string()));
        assert_eq!(config.format, LogFormat::Pretty);
        assert_eq!(config.file, None);
    }
}
