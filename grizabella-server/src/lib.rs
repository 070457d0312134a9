pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod filters;
pub mod state;

pub use api::create_router;
pub use error::ApiError;
pub use state::AppState;
