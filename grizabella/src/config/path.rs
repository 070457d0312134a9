//! Instance-root path resolution.

use super::models::StorageConfig;
use super::DB_PATH_ENV_VAR;
use std::path::{Path, PathBuf};

/// Resolve the on-disk "instance root" directory for a storage configuration.
///
/// - `GRIZABELLA_DB_PATH`, if set, overrides everything and is used verbatim.
/// - `db_name == "default"` resolves under the per-user data directory.
/// - Any other bare (non-absolute) name resolves under `<data_dir>/databases/<name>`.
/// - An absolute path is used as-is.
pub fn resolve_db_path(config: &StorageConfig) -> PathBuf {
    if let Ok(path) = std::env::var(DB_PATH_ENV_VAR) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    let name = Path::new(&config.db_name);
    if name.is_absolute() {
        return name.to_path_buf();
    }

    if config.db_name == "default" {
        return config.data_dir.join("default");
    }

    config.data_dir.join("databases").join(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_name_resolves_under_databases() {
        let cfg = StorageConfig {
            db_name: "myproject".to_string(),
            data_dir: PathBuf::from("/tmp/gz"),
        };
        assert_eq!(
            resolve_db_path(&cfg),
            PathBuf::from("/tmp/gz/databases/myproject")
        );
    }

    #[test]
    fn default_resolves_under_data_dir() {
        let cfg = StorageConfig {
            db_name: "default".to_string(),
            data_dir: PathBuf::from("/tmp/gz"),
        };
        assert_eq!(resolve_db_path(&cfg), PathBuf::from("/tmp/gz/default"));
    }

    #[test]
    fn absolute_path_used_as_is() {
        let cfg = StorageConfig {
            db_name: "/srv/grizabella/instance".to_string(),
            data_dir: PathBuf::from("/tmp/gz"),
        };
        assert_eq!(
            resolve_db_path(&cfg),
            PathBuf::from("/srv/grizabella/instance")
        );
    }
}
