//! Embedding providers.

use async_trait::async_trait;
use jr_core::Embedding;
use sha2::{Digest, Sha256};

/// Maps text to a fixed-length vector.
///
/// Implementations must return an empty vector for empty input and otherwise
/// a vector whose length is stable for a given model.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn embed(&self, text: &str) -> anyhow::Result<Embedding>;
}

/// Deterministic SHA-256 based embeddings, for when no model is available.
///
/// Identical text always yields the identical 32-dimensional vector; there is
/// no notion of semantic closeness.
#[derive(Debug, Clone, Copy, Default)]
pub struct HashingEmbeddingProvider;

impl HashingEmbeddingProvider {
    pub const DIMENSION: usize = 32;

    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EmbeddingProvider for HashingEmbeddingProvider {
    fn name(&self) -> &str {
        "hashing"
    }

    async fn embed(&self, text: &str) -> anyhow::Result<Embedding> {
        if text.is_empty() {
            return Ok(Vec::new());
        }
        let digest = Sha256::digest(text.as_bytes());
        Ok(digest.iter().map(|&b| f32::from(b) / 255.0).collect())
    }
}
