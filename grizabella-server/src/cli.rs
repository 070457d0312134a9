use clap::{Arg, Command, ValueHint};
use std::path::PathBuf;

/// Command-line arguments for `grizabella-server`.
#[derive(Debug, Clone)]
pub struct CliArgs {
    pub port: Option<u16>,
    pub data_dir: Option<PathBuf>,
    pub config_file: Option<PathBuf>,
    pub log_level: Option<String>,
}

impl CliArgs {
    pub fn parse() -> Self {
        let matches = Command::new("grizabella-server")
            .version(grizabella::VERSION)
            .about("HTTP API server for the Grizabella knowledge engine")
            .arg(
                Arg::new("port")
                    .short('p')
                    .long("port")
                    .value_name("PORT")
                    .help("Port to listen on (env: GRIZABELLA_PORT)")
                    .value_hint(ValueHint::Other)
                    .value_parser(clap::value_parser!(u16)),
            )
            .arg(
                Arg::new("data_dir")
                    .short('d')
                    .long("data-dir")
                    .value_name("DIR")
                    .help("Instance data directory (env: GRIZABELLA_DB_PATH)")
                    .value_hint(ValueHint::DirPath)
                    .value_parser(clap::value_parser!(PathBuf)),
            )
            .arg(
                Arg::new("config")
                    .short('c')
                    .long("config")
                    .value_name("FILE")
                    .help("Configuration file path, merged under CLI/env overrides")
                    .value_hint(ValueHint::FilePath)
                    .value_parser(clap::value_parser!(PathBuf)),
            )
            .arg(
                Arg::new("log_level")
                    .long("log-level")
                    .value_name("LEVEL")
                    .help("Log level (trace, debug, info, warn, error)"),
            )
            .get_matches();

        Self {
            port: matches.get_one::<u16>("port").copied(),
            data_dir: matches.get_one::<PathBuf>("data_dir").cloned(),
            config_file: matches.get_one::<PathBuf>("config").cloned(),
            log_level: matches.get_one::<String>("log_level").cloned(),
        }
    }
}
