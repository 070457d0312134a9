//! Configuration system for Grizabella.
//!
//! Supports loading configuration from multiple layered sources (defaults,
//! an optional file, then environment variables under the `GRIZABELLA_`
//! prefix) with validation, and resolves the on-disk "instance root" that
//! the three stores and schema metadata live under.

mod builder;
mod loader;
mod models;
mod path;
#[cfg(test)]
mod tests;
mod validation;

pub use builder::ConfigBuilder;
pub use loader::ConfigLoader;
pub use models::*;
pub use path::resolve_db_path;

/// Default configuration file names that the system will look for.
pub const DEFAULT_CONFIG_FILES: &[&str] = &[
    "grizabella.toml",
    "grizabella.yaml",
    "grizabella.yml",
    "grizabella.json",
    ".grizabella/config.toml",
    ".grizabella/config.yaml",
    ".grizabella/config.yml",
    ".grizabella/config.json",
];

/// Environment variable prefix for Grizabella configuration.
pub const ENV_PREFIX: &str = "GRIZABELLA_";

/// Environment variable that overrides the resolved instance root directly.
pub const DB_PATH_ENV_VAR: &str = "GRIZABELLA_DB_PATH";

/// Configuration error type.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Error occurred during file loading.
    #[error("failed to load configuration file: {0}")]
    FileLoadError(String),

    /// Error occurred during validation.
    #[error("configuration validation error: {0}")]
    ValidationError(String),

    /// Error occurred during parsing.
    #[error("configuration parsing error: {0}")]
    ParseError(String),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
