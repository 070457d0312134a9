//! Server configuration: host/port plus the data directory passed through
//! to `grizabella::config::ConfigBuilder`.

use crate::cli::CliArgs;
use anyhow::Result;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: Option<PathBuf>,
    pub log_level: Option<String>,
}

impl ServerConfig {
    /// Merge CLI arguments with `GRIZABELLA_`-prefixed environment
    /// variables, CLI taking precedence.
    pub fn from_cli_and_env(cli_args: CliArgs) -> Result<Self> {
        let port = cli_args
            .port
            .or_else(|| std::env::var("GRIZABELLA_PORT").ok().and_then(|v| v.parse().ok()))
            .unwrap_or(8080);

        let host = std::env::var("GRIZABELLA_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let data_dir = cli_args
            .data_dir
            .or_else(|| std::env::var("GRIZABELLA_DB_PATH").ok().map(PathBuf::from));

        let log_level = cli_args.log_level.or_else(|| std::env::var("RUST_LOG").ok());

        Ok(Self {
            host,
            port,
            data_dir,
            log_level,
        })
    }
}
