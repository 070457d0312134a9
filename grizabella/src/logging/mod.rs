//! Structured logging infrastructure for Grizabella.
//!
//! Thin wrapper around `tracing-subscriber` that turns a `LoggingConfig`
//! into an initialized global subscriber: level plus an `EnvFilter` layer
//! (so `RUST_LOG` can still narrow things down at runtime), JSON/compact/
//! pretty formatting, and an optional additional file sink.

#[cfg(test)]
mod tests;

use crate::config::{LogFormat, LogLevel, LoggingConfig};
use std::path::Path;
use tracing::Level;
use tracing_appender::non_blocking::NonBlocking;
use tracing_subscriber::EnvFilter;

/// Error type for logging operations.
#[derive(Debug)]
pub enum LogError {
    IoError(std::io::Error),
    InvalidLogLevel(String),
    SubscriberError(Box<dyn std::error::Error + Send + Sync>),
}

impl From<std::io::Error> for LogError {
    fn from(err: std::io::Error) -> Self {
        LogError::IoError(err)
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for LogError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        LogError::SubscriberError(err)
    }
}

/// Result type for logging operations.
pub type Result<T> = std::result::Result<T, LogError>;

/// Initialize the global tracing subscriber from a `LoggingConfig`.
///
/// Idempotent: a second call (e.g. when a CLI and the library it embeds
/// both try to initialize logging) is swallowed rather than propagated.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let result = match config.format {
        LogFormat::Json => init_json(config),
        LogFormat::Compact => init_compact(config),
        LogFormat::Pretty => init_pretty(config),
        LogFormat::Default => init_default(config),
    };

    if let Err(LogError::SubscriberError(ref e)) = result {
        let msg = e.to_string();
        if msg.contains("SetGlobalDefaultError") || msg.contains("set_global_default") {
            return Ok(());
        }
    }
    result
}

fn env_filter(config: &LoggingConfig) -> EnvFilter {
    let level = to_tracing_level(&config.level);
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()))
}

fn init_json(config: &LoggingConfig) -> Result<()> {
    let builder = tracing_subscriber::fmt()
        .json()
        .with_env_filter(env_filter(config))
        .with_target(true)
        .with_line_number(true);

    if let Some(file_path) = &config.file {
        let (writer, guard) = create_non_blocking_file(file_path)?;
        std::mem::forget(guard);
        builder.with_writer(writer).try_init().map_err(Into::into)
    } else if config.stdout {
        builder.try_init().map_err(Into::into)
    } else {
        Ok(())
    }
}

fn init_compact(config: &LoggingConfig) -> Result<()> {
    let builder = tracing_subscriber::fmt()
        .compact()
        .with_env_filter(env_filter(config))
        .with_target(true)
        .with_line_number(true);

    if let Some(file_path) = &config.file {
        let (writer, guard) = create_non_blocking_file(file_path)?;
        std::mem::forget(guard);
        builder.with_writer(writer).try_init().map_err(Into::into)
    } else if config.stdout {
        builder.try_init().map_err(Into::into)
    } else {
        Ok(())
    }
}

fn init_pretty(config: &LoggingConfig) -> Result<()> {
    let builder = tracing_subscriber::fmt()
        .pretty()
        .with_env_filter(env_filter(config))
        .with_target(true)
        .with_line_number(true);

    if let Some(file_path) = &config.file {
        let (writer, guard) = create_non_blocking_file(file_path)?;
        std::mem::forget(guard);
        builder.with_writer(writer).try_init().map_err(Into::into)
    } else if config.stdout {
        builder.try_init().map_err(Into::into)
    } else {
        Ok(())
    }
}

fn init_default(config: &LoggingConfig) -> Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_target(true)
        .with_line_number(true);

    if let Some(file_path) = &config.file {
        let (writer, guard) = create_non_blocking_file(file_path)?;
        std::mem::forget(guard);
        builder.with_writer(writer).try_init().map_err(Into::into)
    } else if config.stdout {
        builder.try_init().map_err(Into::into)
    } else {
        Ok(())
    }
}

fn to_tracing_level(level: &LogLevel) -> Level {
    match level {
        LogLevel::Trace => Level::TRACE,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Info => Level::INFO,
        LogLevel::Warn => Level::WARN,
        LogLevel::Error => Level::ERROR,
    }
}

fn create_non_blocking_file(
    path: impl AsRef<Path>,
) -> Result<(NonBlocking, tracing_appender::non_blocking::WorkerGuard)> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file_appender = tracing_appender::rolling::never(
        path.parent().unwrap_or_else(|| Path::new(".")),
        path.file_name().unwrap_or_default(),
    );
    Ok(tracing_appender::non_blocking(file_appender))
}

/// Parse a log level string into a `LogLevel`.
pub fn parse_log_level(level: &str) -> Result<LogLevel> {
    level
        .parse()
        .map_err(|_| LogError::InvalidLogLevel(level.to_string()))
}

impl std::fmt::Display for LogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogError::IoError(e) => write!(f, "IO error: {}", e),
            LogError::SubscriberError(e) => write!(f, "subscriber error: {}", e),
            LogError::InvalidLogLevel(s) => write!(f, "invalid log level: {}", s),
        }
    }
}

impl std::error::Error for LogError {}
