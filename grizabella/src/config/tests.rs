#[cfg(test)]
mod tests {
    use crate::config::{validation, ConfigBuilder, GrizabellaConfig, LogLevel};
    use std::path::PathBuf;

    #[test]
    fn test_default_config() {
        let config = GrizabellaConfig::default();
        assert_eq!(config.storage.db_name, "default");
        assert_eq!(config.logging.level, LogLevel::Info);
        assert_eq!(config.retry.max_attempts, 4);
    }

    #[test]
    fn test_config_builder() {
        let config = ConfigBuilder::new()
            .with_data_dir("/tmp/test_data")
            .with_db_name("myproject")
            .with_embedding_model("test-model")
            .with_log_level(LogLevel::Debug)
            .build()
            .unwrap();

        assert_eq!(config.storage.data_dir, PathBuf::from("/tmp/test_data"));
        assert_eq!(config.storage.db_name, "myproject");
        assert_eq!(config.embedding.default_model_id, "test-model");
        assert_eq!(config.logging.level, LogLevel::Debug);
    }

    #[test]
    fn test_validation_rejects_empty_db_name() {
        let config = ConfigBuilder::new().with_db_name("").build();
        assert!(config.is_err());
    }

    #[test]
    fn test_validation_passes_for_default_config() {
        let config = GrizabellaConfig::default();
        assert!(validation::validate_config(&config).is_ok());
    }

    #[test]
    fn test_predefined_testing_config() {
        let test = ConfigBuilder::testing().build().unwrap();
        assert_eq!(test.storage.data_dir, PathBuf::from("./test_data"));
        assert_eq!(test.logging.level, LogLevel::Warn);
        assert_eq!(test.retry.max_attempts, 1);
    }

    #[test]
    fn test_config_serialization_round_trip() {
        let config = ConfigBuilder::new()
            .with_data_dir("/tmp/test_data")
            .with_embedding_model("test-model")
            .build()
            .unwrap();

        let json = serde_json::to_string(&config).unwrap();
        let deserialized: GrizabellaConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(config.storage.data_dir, deserialized.storage.data_dir);
        assert_eq!(
            config.embedding.default_model_id,
            deserialized.embedding.default_model_id
        );
    }
}
