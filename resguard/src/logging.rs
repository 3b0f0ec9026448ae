//! Logging setup for binaries that use resguard.
//!
//! The library itself only emits `tracing` events. [`LoggingConfig`]
//! installs a `tracing-subscriber` formatter for programs that want those
//! events on the console.

use tracing::level_filters::LevelFilter;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::errors::{ResourceResult, WrapErr};

/// Log level enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Everything, including per-event tracing
    Trace,
    /// Debug output
    Debug,
    /// Lifecycle events
    Info,
    /// Warnings only
    Warn,
    /// Errors only, including swallowed release failures
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Minimum log level, used when `RUST_LOG` is not set
    pub level: LogLevel,
    /// Whether to print the event target
    pub show_target: bool,
    /// Whether to colorize output
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            show_target: false,
            ansi: true,
        }
    }
}

impl LoggingConfig {
    /// Creates a new logging configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the minimum log level
    pub const fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Prints event targets
    pub const fn with_target(mut self) -> Self {
        self.show_target = true;
        self
    }

    /// Disables colored output
    pub const fn without_ansi(mut self) -> Self {
        self.ansi = false;
        self
    }

    /// The filter to install: `RUST_LOG` when set, the configured level otherwise.
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::builder()
            .with_default_directive(LevelFilter::from_level(self.level.into()).into())
            .from_env_lossy()
    }

    /// Installs the global subscriber.
    ///
    /// Fails with `ErrorKind::Wrapped` if a global subscriber is already set.
    pub fn init(&self) -> ResourceResult<()> {
        tracing_subscriber::fmt()
            .with_env_filter(self.env_filter())
            .with_target(self.show_target)
            .with_ansi(self.ansi)
            .try_init()
            .wrap_err("failed to install the tracing subscriber")
    }
}
