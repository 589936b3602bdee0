//! Structured logging setup on top of `tracing-subscriber`.
//!
//! The kernels emit `tracing` events unconditionally (`debug!` at kernel
//! entry, `trace!` for memo cache hits and evictions, `warn!` when a limit
//! trips). This module installs a subscriber for them and is only available
//! with the `structured-logging` feature:
//!
//! ```toml
//! [dependencies]
//! discourse-kernels = { version = "0.1", features = ["structured-logging"] }
//! ```
//!
//! ```no_run
//! use discourse_kernels::logging::{init_tracing, LogFormat, LogLevel};
//!
//! init_tracing(LogLevel::Debug, LogFormat::Json).unwrap();
//! tracing::info!(corpus = "wsj", "computing gram matrix");
//! ```

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{KernelError, Result};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable multi-line output
    Pretty,
    /// Single-line output without colors
    Compact,
    /// One JSON object per event
    Json,
}

/// Log level filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Everything, including memo cache evictions
    Trace,
    /// Kernel entry events and higher
    Debug,
    /// Info and higher
    Info,
    /// Resource limit warnings and errors
    Warn,
    /// Errors only
    Error,
}

impl LogLevel {
    fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Builder for the global tracing subscriber.
#[derive(Debug, Clone)]
pub struct TracingBuilder {
    format: LogFormat,
    level: LogLevel,
    env_filter: Option<String>,
    with_targets: bool,
    with_thread_ids: bool,
}

impl Default for TracingBuilder {
    fn default() -> Self {
        Self {
            format: LogFormat::Compact,
            level: LogLevel::Info,
            env_filter: None,
            with_targets: true,
            with_thread_ids: false,
        }
    }
}

impl TracingBuilder {
    /// Create a builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output format.
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the log level filter.
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Set an explicit filter directive such as `discourse_kernels=trace`.
    ///
    /// Takes precedence over the level and over `RUST_LOG`.
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Include module paths in events.
    pub fn with_targets(mut self, enabled: bool) -> Self {
        self.with_targets = enabled;
        self
    }

    /// Include thread ids, useful for parallel Gram matrices.
    pub fn with_thread_ids(mut self, enabled: bool) -> Self {
        self.with_thread_ids = enabled;
        self
    }

    fn filter(&self) -> Result<EnvFilter> {
        match &self.env_filter {
            Some(directive) => EnvFilter::try_new(directive).map_err(|e| {
                KernelError::Logging(format!("invalid filter '{}': {}", directive, e))
            }),
            None => Ok(EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(self.level.as_str()))),
        }
    }

    /// Install the subscriber. Fails if one is already installed.
    pub fn init(self) -> Result<()> {
        let filter = self.filter()?;
        let layer = fmt::layer()
            .with_target(self.with_targets)
            .with_thread_ids(self.with_thread_ids);
        let registry = tracing_subscriber::registry().with(filter);

        let installed = match self.format {
            LogFormat::Pretty => registry.with(layer.pretty()).try_init(),
            LogFormat::Compact => registry.with(layer.with_ansi(false).compact()).try_init(),
            LogFormat::Json => registry.with(layer.json()).try_init(),
        };
        installed.map_err(|e| KernelError::Logging(e.to_string()))
    }
}

/// Install a global subscriber with the given level and format.
pub fn init_tracing(level: LogLevel, format: LogFormat) -> Result<()> {
    TracingBuilder::new()
        .with_level(level)
        .with_format(format)
        .init()
}
