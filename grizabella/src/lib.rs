//! # Grizabella
//!
//! A tri-store knowledge engine: a relational store for typed property
//! bags, a vector store for embedding similarity, and a graph store for
//! typed directed relationships, unified behind a single schema-driven
//! API and kept consistent by a Write Coordinator and a Query &
//! Consistency Engine.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use grizabella::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let db = Grizabella::testing().await?;
//!
//!     db.create_object_type(ObjectTypeDefinition::new(
//!         "Paper",
//!         vec![
//!             PropertyDefinition::new("id", PropertyDataType::Uuid).primary_key(),
//!             PropertyDefinition::new("title", PropertyDataType::Text),
//!         ],
//!     ))
//!     .await?;
//!
//!     let mut props = std::collections::HashMap::new();
//!     props.insert("title".to_string(), PropertyValue::Text("Graph Theory".into()));
//!     let paper = db.upsert_object("Paper", None, props, None).await?;
//!     println!("stored {}", paper.id());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`schema`] — the Schema Registry: object types, relation types, and
//!   embedding definitions, plus instance validation.
//! - [`adapters`] — the three store contracts (`RelationalAdapter`,
//!   `VectorAdapter`, `GraphAdapter`) and their in-memory reference
//!   implementations.
//! - [`write`] — the Write Coordinator: cross-store write ordering,
//!   per-id striped locking, and coherence-repair bookkeeping.
//! - [`embedding`] — the Embedding Coordinator: keeps vectors in sync
//!   with their source text.
//! - [`query`] — the Query & Consistency Engine: IR, planner, executor.
//! - [`engine`] — [`Grizabella`], the public facade tying all of the
//!   above together.

pub mod adapters;
pub mod config;
pub mod embedding;
pub mod engine;
pub mod error;
pub mod logging;
pub mod query;
pub mod schema;
pub mod types;
pub mod write;

/// The prelude re-exports the types most callers need.
pub mod prelude {
    pub use crate::engine::Grizabella;
    pub use crate::error::{ErrorCode, GrizabellaError, Result};
    pub use crate::query::{Clause, Component, EmbeddingSearch, GraphHop, Query, QueryResult};
    pub use crate::adapters::{Direction, Operator, RelFilter};
    pub use crate::config::GrizabellaConfig;
    pub use crate::types::{
        EmbeddingDefinition, ObjectInstance, ObjectTypeDefinition, PropertyDataType, PropertyDefinition,
        PropertyValue, RelationInstance, RelationTypeDefinition,
    };
}

/// Current library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use engine::Grizabella;
pub use error::{ErrorCode, GrizabellaError, Result};

/// Open a `Grizabella` instance with the provided configuration,
/// initializing logging in the process. Swallows a second logging-init
/// call so a CLI and the library it embeds can both call this safely.
pub async fn init(config: config::GrizabellaConfig) -> Result<Grizabella> {
    let _ = logging::init(&config.logging);
    Grizabella::open(config).await
}

/// Open a `Grizabella` instance with default configuration.
pub async fn init_with_defaults() -> Result<Grizabella> {
    let config = config::ConfigBuilder::new().build()?;
    init(config).await
}
