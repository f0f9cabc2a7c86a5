//! Forwarding of log output to a host supplied logger.

use std::sync::{Arc, OnceLock};

use strum::Display;

/// A host logger that receives the log output of the widget.
///
/// The browser binding forwards to the developer console, native hosts may forward to
/// whatever they log with.
///
/// # Examples
///
/// ```rust
/// use phonekit_core::logger::{LogLevel, Logger};
///
/// struct StderrLogger;
///
/// impl Logger for StderrLogger {
///     fn log(&self, level: LogLevel, message: String) {
///         eprintln!("[{level}] {message}");
///     }
/// }
/// ```
///
/// Phone numbers are masked and secrets (codes, session tokens) are never part of a message.
pub trait Logger: Sync + Send {
    /// Logs a message at the specified log level.
    fn log(&self, level: LogLevel, message: String);
}

/// Severity of a log message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum LogLevel {
    /// Very detailed messages, e.g. issuance polling.
    Trace,
    /// Requests and step changes.
    Debug,
    /// Progress of the flow.
    Info,
    /// Refused requests.
    Warn,
    /// Requests that did not get a response.
    Error,
}

/// Forwards records of the `log` facade to the [`Logger`] set with [`set_logger`].
struct ForeignLogger;

impl log::Log for ForeignLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        // Debug and trace output of dependencies (reqwest, hyper) is noise for the host.
        metadata.level() <= log::Level::Info || metadata.target().starts_with("phonekit")
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        if let Some(logger) = LOGGER_INSTANCE.get() {
            logger.log(log_level(record.level()), record.args().to_string());
        } else {
            eprintln!("Logger not set: {}", record.args());
        }
    }

    fn flush(&self) {}
}

const fn log_level(level: log::Level) -> LogLevel {
    match level {
        log::Level::Error => LogLevel::Error,
        log::Level::Warn => LogLevel::Warn,
        log::Level::Info => LogLevel::Info,
        log::Level::Debug => LogLevel::Debug,
        log::Level::Trace => LogLevel::Trace,
    }
}

static LOGGER_INSTANCE: OnceLock<Arc<dyn Logger>> = OnceLock::new();

/// Sets the global logger.
///
/// Only the first logger is kept; later calls are ignored. Events of the `tracing` macros
/// reach this logger through the `log` facade unless a `tracing` subscriber is installed.
pub fn set_logger(logger: Arc<dyn Logger>) {
    if LOGGER_INSTANCE.set(logger).is_err() {
        eprintln!("Logger already set");
        return;
    }

    if let Err(e) = init_logger() {
        eprintln!("Failed to set logger: {e}");
    }
}

/// Installs [`ForeignLogger`] as the `log` backend.
///
/// # Errors
///
/// Returns a `log::SetLoggerError` if another `log` backend is already installed.
fn init_logger() -> Result<(), log::SetLoggerError> {
    static LOGGER: ForeignLogger = ForeignLogger;
    log::set_logger(&LOGGER)?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Log;

    fn metadata(level: log::Level, target: &str) -> log::Metadata<'_> {
        log::Metadata::builder().level(level).target(target).build()
    }

    #[test]
    fn test_dependency_debug_output_is_dropped() {
        let logger = ForeignLogger;
        assert!(logger.enabled(&metadata(log::Level::Debug, "phonekit_core::flow")));
        assert!(logger.enabled(&metadata(log::Level::Warn, "reqwest::connect")));
        assert!(!logger.enabled(&metadata(log::Level::Debug, "hyper_util::client")));
        assert!(!logger.enabled(&metadata(log::Level::Trace, "reqwest")));
    }

    #[test]
    fn test_log_level() {
        assert_eq!(log_level(log::Level::Warn), LogLevel::Warn);
        assert_eq!(log_level(log::Level::Trace), LogLevel::Trace);
        assert_eq!(LogLevel::Info.to_string(), "INFO");
    }
}
