use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::Result;
use grizabella::config::{ConfigBuilder, ConfigLoader, LogLevel};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

mod api;
mod cli;
mod config;
mod error;
mod filters;
mod state;

use crate::api::create_router;
use crate::cli::CliArgs;
use crate::config::ServerConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();
    let server_config = ServerConfig::from_cli_and_env(cli_args.clone())?;

    let grizabella_config = if let Some(config_file) = &cli_args.config_file {
        let mut loader = ConfigLoader::new();
        match loader.load_file(config_file).and_then(|l| l.extract()) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "failed to load config file {}: {}. falling back to defaults",
                    config_file.display(),
                    e
                );
                build_default_config(&server_config)?
            }
        }
    } else {
        build_default_config(&server_config)?
    };

    let db = grizabella::init(grizabella_config).await?;
    info!("grizabella engine initialized, version {}", grizabella::VERSION);

    let app_state = Arc::new(AppState::new(db, server_config.clone()));

    let app = create_router(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], server_config.port));
    let listener = TcpListener::bind(addr).await?;

    info!("server listening on {}", addr);
    info!("API documentation available at http://{}/docs", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn build_default_config(server_config: &ServerConfig) -> Result<grizabella::config::GrizabellaConfig> {
    let mut builder = ConfigBuilder::new();
    if let Some(data_dir) = &server_config.data_dir {
        builder = builder.with_data_dir(data_dir);
    }
    if let Some(level) = &server_config.log_level {
        if let Ok(level) = LogLevel::from_str(level) {
            builder = builder.with_log_level(level);
        }
    }
    Ok(builder.build()?)
}
