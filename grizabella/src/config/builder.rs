//! Configuration builder.
//!
//! Provides an ergonomic builder API for creating `GrizabellaConfig`
//! instances without going through a config file.

use super::{models::*, validation, Result};
use std::path::{Path, PathBuf};

/// Builder for creating `GrizabellaConfig` instances.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: GrizabellaConfig,
}

impl ConfigBuilder {
    /// Create a new configuration builder with default values.
    pub fn new() -> Self {
        Self {
            config: GrizabellaConfig::default(),
        }
    }

    /// Set the instance root name or absolute path.
    pub fn with_db_name(mut self, name: impl Into<String>) -> Self {
        self.config.storage.db_name = name.into();
        self
    }

    /// Set the base per-user data directory used to resolve bare names.
    pub fn with_data_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config.storage.data_dir = path.as_ref().to_path_buf();
        self
    }

    /// Set the default embedding model id.
    pub fn with_embedding_model(mut self, model_id: impl Into<String>) -> Self {
        self.config.embedding.default_model_id = model_id.into();
        self
    }

    /// Set the log level.
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.config.logging.level = level;
        self
    }

    /// Configure logging to also write to a file.
    pub fn with_log_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config.logging.file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Use default logging configuration (console output at Info level).
    pub fn with_default_logging(mut self) -> Self {
        self.config.logging.level = LogLevel::Info;
        self.config.logging.format = LogFormat::Default;
        self.config.logging.file = None;
        self
    }

    /// Set the retry policy for `Unavailable` adapter errors.
    pub fn with_retry(mut self, max_attempts: u32, base_delay_ms: u64, max_delay_ms: u64) -> Self {
        self.config.retry = RetryConfig {
            max_attempts,
            base_delay_ms,
            max_delay_ms,
            ..self.config.retry
        };
        self
    }

    /// Bound every public operation by a deadline, retries included.
    pub fn with_operation_timeout(mut self, timeout_ms: u64) -> Self {
        self.config.retry.operation_timeout_ms = Some(timeout_ms);
        self
    }

    /// Create a configuration suitable for automated tests: an isolated
    /// temp-rooted instance with terse logging and minimal retry budget.
    pub fn testing() -> Self {
        Self::new()
            .with_data_dir(PathBuf::from("./test_data"))
            .with_log_level(LogLevel::Warn)
            .with_retry(1, 10, 10)
    }

    /// Build the configuration, validating it in the process.
    pub fn build(self) -> Result<GrizabellaConfig> {
        validation::validate_config(&self.config)?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
