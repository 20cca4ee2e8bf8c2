//! Leveled logging used by the scheduler.
//!
//! The scheduler never logs through a global: it holds the [`Logger`] it was
//! constructed with. By default that is [`LogLogger`], which forwards every
//! line to the [`log`] facade so any `log` backend picks it up.

use std::fmt;

pub use log::Level;

/// Target used for every line emitted through [`LogLogger`].
pub const LOG_TARGET: &str = "tasktick";

/// A leveled logging sink.
///
/// Implementors only need [`Logger::log`]; the per-level helpers forward to it.
///
/// # Examples
///
/// ```
/// use std::fmt;
/// use tasktick::logger::{Level, Logger};
///
/// struct Stderr;
///
/// impl Logger for Stderr {
///     fn log(&self, level: Level, args: fmt::Arguments<'_>) {
///         eprintln!("[{}] {}", level, args);
///     }
/// }
///
/// Stderr.info(format_args!("hello {}", 42));
/// ```
pub trait Logger: Send + Sync {
    /// Writes one line at the given level.
    fn log(&self, level: Level, args: fmt::Arguments<'_>);

    fn debug(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Debug, args);
    }

    fn info(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Info, args);
    }

    fn warn(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Warn, args);
    }

    fn error(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Error, args);
    }
}

/// Forwards to the `log` crate under the [`LOG_TARGET`] target.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogLogger;

impl Logger for LogLogger {
    fn log(&self, level: Level, args: fmt::Arguments<'_>) {
        log::log!(target: LOG_TARGET, level, "{}", args);
    }
}

/// Discards every line.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn log(&self, _level: Level, _args: fmt::Arguments<'_>) {}
}

/// Forwards to `tracing` events.
#[cfg(feature = "tracing-integration")]
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

#[cfg(feature = "tracing-integration")]
impl Logger for TracingLogger {
    fn log(&self, level: Level, args: fmt::Arguments<'_>) {
        match level {
            Level::Error => tracing::error!(target: LOG_TARGET, "{}", args),
            Level::Warn => tracing::warn!(target: LOG_TARGET, "{}", args),
            Level::Info => tracing::info!(target: LOG_TARGET, "{}", args),
            Level::Debug => tracing::debug!(target: LOG_TARGET, "{}", args),
            Level::Trace => tracing::trace!(target: LOG_TARGET, "{}", args),
        }
    }
}

/// Installs `env_logger` as the `log` backend, honouring `RUST_LOG`.
///
/// Returns an error if another logger was installed first.
#[cfg(feature = "basic-logging")]
pub fn init() -> Result<(), log::SetLoggerError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).try_init()
}
