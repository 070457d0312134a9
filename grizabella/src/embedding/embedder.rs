//! The `Embedder` trait: turns source text into a fixed-length vector.
//! A narrow async boundary so real model backends (local ONNX, remote
//! API) can sit behind the same interface as the deterministic reference
//! embedder used in tests.

use async_trait::async_trait;

/// Failure producing a vector from text: an upstream model error or a
/// declared-dimension mismatch on the output.
#[derive(Debug, thiserror::Error, Clone)]
pub enum EmbedderError {
    #[error("embedding model '{model_id}' failed: {message}")]
    ModelFailure { model_id: String, message: String },

    #[error("embedding model '{model_id}' returned {actual} dimensions, expected {expected}")]
    DimensionMismatch {
        model_id: String,
        expected: usize,
        actual: usize,
    },
}

pub type EmbedderResult<T> = std::result::Result<T, EmbedderError>;

#[async_trait]
pub trait Embedder: Send + Sync + std::fmt::Debug {
    /// The model identifier this embedder answers to (must match an
    /// `embedding_model_id` on a schema's `EmbeddingDefinition`).
    fn model_id(&self) -> &str;

    /// The vector length this embedder always produces.
    fn dimensions(&self) -> usize;

    async fn embed(&self, text: &str) -> EmbedderResult<Vec<f32>>;
}

/// A deterministic reference embedder: hashes the input with SHA-256 and
/// expands the digest into a unit vector. No semantic meaning, but stable
/// and dependency-free, so tests and zero-config deployments always have
/// an embedding path available.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    model_id: String,
    dimensions: usize,
}

impl HashEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            model_id: "reference-hash-embedder".to_string(),
            dimensions,
        }
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed(&self, text: &str) -> EmbedderResult<Vec<f32>> {
        use sha2::{Digest, Sha256};
        let mut vector = Vec::with_capacity(self.dimensions);
        let mut counter: u32 = 0;
        while vector.len() < self.dimensions {
            let mut hasher = Sha256::new();
            hasher.update(text.as_bytes());
            hasher.update(counter.to_le_bytes());
            let digest = hasher.finalize();
            for byte in digest {
                if vector.len() == self.dimensions {
                    break;
                }
                // Map into [-1.0, 1.0] so cosine similarity behaves sanely.
                vector.push((byte as f32 / 127.5) - 1.0);
            }
            counter += 1;
        }
        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for component in &mut vector {
                *component /= norm;
            }
        }
        Ok(vector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hash_embedder_is_deterministic() {
        let embedder = HashEmbedder::new(16);
        let a = embedder.embed("hello world").await.unwrap();
        let b = embedder.embed("hello world").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 16);
    }

    #[tokio::test]
    async fn hash_embedder_differs_by_input() {
        let embedder = HashEmbedder::new(16);
        let a = embedder.embed("hello").await.unwrap();
        let b = embedder.embed("goodbye").await.unwrap();
        assert_ne!(a, b);
    }
}
