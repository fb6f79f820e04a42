//! Logging setup
//!
//! Fitchy emits `tracing` events (registrations, loads, reloads, interceptor
//! lookups and suppressed calls). Applications that do not install their own
//! subscriber can use [`LogConfig`]:
//!
//! ```no_run
//! use fitchy_core::logging::*;
//!
//! LogConfig::new()
//!     .level(LogLevel::Debug)
//!     .format(LogFormat::Pretty)
//!     .init()
//!     .ok();
//!
//! debug!("Feature logging enabled");
//! ```
//!
//! The `FITCHY_LOG` environment variable takes precedence over the configured
//! level, using `EnvFilter` directives such as `fitchy_core=trace`.

use std::io;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub use tracing::{debug, error, info, trace, warn};

/// Environment variable holding filter directives.
pub const LOG_ENV: &str = "FITCHY_LOG";

/// Log level for filtering messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Output format for log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Structured, machine-readable (default)
    Json,
    /// Multi-line, for development
    Pretty,
    /// Single line, minimal
    Compact,
}

/// Output destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutput {
    Stdout,
    Stderr,
}

/// Subscriber configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    pub output: LogOutput,
    /// Include target (module path)
    pub targets: bool,
    pub thread_ids: bool,
    /// Explicit filter directives; overrides `level` and `FITCHY_LOG`
    pub env_filter: Option<String>,
}

impl LogConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn output(mut self, output: LogOutput) -> Self {
        self.output = output;
        self
    }

    pub fn with_targets(mut self, enable: bool) -> Self {
        self.targets = enable;
        self
    }

    pub fn with_thread_ids(mut self, enable: bool) -> Self {
        self.thread_ids = enable;
        self
    }

    /// Set filter directives, e.g. `"fitchy_core=debug"`
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Build the filter: explicit directives, then `FITCHY_LOG`, then `level`.
    pub fn filter(&self) -> EnvFilter {
        if let Some(directives) = &self.env_filter {
            if let Ok(filter) = EnvFilter::try_new(directives) {
                return filter;
            }
        }

        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(self.level.as_str()))
    }

    /// Install the global subscriber.
    ///
    /// Fails when a subscriber is already installed.
    pub fn init(self) -> Result<(), tracing_subscriber::util::TryInitError> {
        match self.output {
            LogOutput::Stdout => self.init_with_writer(io::stdout),
            LogOutput::Stderr => self.init_with_writer(io::stderr),
        }
    }

    fn init_with_writer<W>(&self, writer: W) -> Result<(), tracing_subscriber::util::TryInitError>
    where
        W: for<'a> fmt::MakeWriter<'a> + Send + Sync + 'static,
    {
        let registry = tracing_subscriber::registry().with(self.filter());

        match self.format {
            LogFormat::Json => registry
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(writer)
                        .with_target(self.targets)
                        .with_thread_ids(self.thread_ids),
                )
                .try_init(),
            LogFormat::Pretty => registry
                .with(
                    fmt::layer()
                        .pretty()
                        .with_writer(writer)
                        .with_target(self.targets)
                        .with_thread_ids(self.thread_ids),
                )
                .try_init(),
            LogFormat::Compact => registry
                .with(
                    fmt::layer()
                        .compact()
                        .with_writer(writer)
                        .with_target(self.targets)
                        .with_thread_ids(self.thread_ids),
                )
                .try_init(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Json,
            output: LogOutput::Stdout,
            targets: true,
            thread_ids: false,
            env_filter: None,
        }
    }
}
