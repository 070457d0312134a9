//! Application state shared across all handlers.

use grizabella::Grizabella;

use crate::config::ServerConfig;

#[derive(Debug)]
pub struct AppState {
    pub db: Grizabella,
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(db: Grizabella, config: ServerConfig) -> Self {
        Self { db, config }
    }
}
