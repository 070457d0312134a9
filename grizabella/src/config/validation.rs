//! Configuration validation utilities.

use super::models::*;
use super::ConfigError;

/// Validate the entire configuration.
pub fn validate_config(config: &GrizabellaConfig) -> Result<(), ConfigError> {
    validate_storage_config(&config.storage)?;
    validate_embedding_config(&config.embedding)?;
    validate_retry_config(&config.retry)?;
    Ok(())
}

fn validate_storage_config(config: &StorageConfig) -> Result<(), ConfigError> {
    if config.db_name.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "db_name cannot be empty".to_string(),
        ));
    }
    if config.data_dir.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "data directory cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_embedding_config(config: &EmbeddingConfig) -> Result<(), ConfigError> {
    if config.default_model_id.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "default_model_id cannot be empty".to_string(),
        ));
    }
    if config.backfill_batch_size == 0 {
        return Err(ConfigError::ValidationError(
            "backfill_batch_size must be greater than 0".to_string(),
        ));
    }
    Ok(())
}

fn validate_retry_config(config: &RetryConfig) -> Result<(), ConfigError> {
    if config.max_delay_ms < config.base_delay_ms {
        return Err(ConfigError::ValidationError(
            "retry.max_delay_ms cannot be less than retry.base_delay_ms".to_string(),
        ));
    }
    Ok(())
}
