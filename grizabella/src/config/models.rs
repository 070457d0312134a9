//! Configuration model definitions.
//!
//! This module contains the configuration structures for every Grizabella
//! component: where the three stores live on disk, how embeddings are
//! computed and retried, and how logging is set up.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Main configuration structure for Grizabella.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GrizabellaConfig {
    /// Storage configuration (instance root and per-store sub-paths).
    pub storage: StorageConfig,

    /// Embedding coordinator configuration.
    pub embedding: EmbeddingConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Retry policy for `Unavailable` adapter errors.
    pub retry: RetryConfig,
}

/// Configuration for the three stores.
///
/// `db_name` resolution: `default` resolves under a per-user data
/// directory, a bare name resolves under `<data_dir>/databases/<name>`,
/// and an absolute path is used as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Logical instance root name or absolute path (see `config::resolve_db_path`).
    pub db_name: String,

    /// Base per-user data directory used to resolve non-absolute `db_name`s.
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let data_dir = directories::ProjectDirs::from("org", "grizabella", "grizabella")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("./data"));

        Self {
            db_name: "default".to_string(),
            data_dir,
        }
    }
}

/// Embedding coordinator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Default embedding model id used when a definition doesn't pin one.
    pub default_model_id: String,

    /// Length (in bytes) of `source_text_preview` stored alongside a vector
    /// before falling back to full-text hashing for change detection.
    pub preview_truncate_bytes: usize,

    /// Number of instances encoded per batch during backfill.
    pub backfill_batch_size: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            default_model_id: "reference-hash-embedder".to_string(),
            preview_truncate_bytes: 256,
            backfill_batch_size: 64,
        }
    }
}

/// Retry policy for `Unavailable` adapter errors, plus the per-operation
/// deadline every public call runs under.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of retry attempts before giving up.
    pub max_attempts: u32,

    /// Base delay in milliseconds; doubled on each subsequent attempt.
    pub base_delay_ms: u64,

    /// Upper bound on a single backoff delay.
    pub max_delay_ms: u64,

    /// Deadline for a single public operation, retries included. `None`
    /// means unbounded.
    pub operation_timeout_ms: Option<u64>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_delay_ms: 50,
            max_delay_ms: 2_000,
            operation_timeout_ms: Some(30_000),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level.
    pub level: LogLevel,

    /// Log format.
    pub format: LogFormat,

    /// File to log to, if any (in addition to / instead of stdout).
    pub file: Option<PathBuf>,

    /// Whether to log to stdout.
    pub stdout: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Default,
            file: None,
            stdout: true,
        }
    }
}

/// Log level.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(format!("invalid log level: {}", s)),
        }
    }
}

/// Log format.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Default,
    Json,
    Compact,
    Pretty,
}
