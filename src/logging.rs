// src/logging.rs

//! Logging setup for `assetdag` using `tracing` + `tracing-subscriber`.
//!
//! Priority for determining the log level:
//! 1. `--log-level` CLI flag (if provided)
//! 2. `ASSETDAG_LOG` environment variable (a level or `EnvFilter` directives)
//! 3. default to `info`
//!
//! Logs are sent to STDERR so that stdout stays free for reports.
//!
//! Run progress goes through [`RunLogger`], an injectable sink. The scheduler
//! and runners accept `Option<Arc<dyn RunLogger>>`; `None` discards output.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::LogLevel;

/// Environment variable holding a default level or filter directives,
/// e.g. `debug` or `info,assetdag::engine=trace`.
pub const LOG_ENV: &str = "ASSETDAG_LOG";

/// Initialise global logging subscriber.
///
/// Fails if a global subscriber is already installed.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let filter = match cli_level {
        Some(level) => EnvFilter::default().add_directive(LevelFilter::from(level).into()),
        None => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info")),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("installing log subscriber: {e}"))
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// Sink for human-readable run progress (asset started, finished, output lines).
pub trait RunLogger: Send + Sync {
    fn println(&self, message: &str);
}

/// Shared, optional logger handle as passed around the crate.
pub type SharedLogger = Option<Arc<dyn RunLogger>>;

/// Forward progress messages to `tracing` at `info` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl RunLogger for TracingLogger {
    fn println(&self, message: &str) {
        info!(target: "assetdag::progress", "{message}");
    }
}

/// Write a message to the logger if one was provided.
pub(crate) fn emit(logger: &SharedLogger, message: &str) {
    if let Some(logger) = logger {
        logger.println(message);
    }
}
