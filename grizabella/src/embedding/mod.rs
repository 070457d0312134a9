//! The Embedding Coordinator: source-property-to-vector sync,
//! change detection, and backfill.

mod coordinator;
mod embedder;

pub use coordinator::{EmbeddingCoordinator, EmbeddingOutcome};
pub use embedder::{Embedder, EmbedderError, EmbedderResult, HashEmbedder};
