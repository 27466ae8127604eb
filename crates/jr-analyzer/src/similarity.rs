//! Near-duplicate detection over previously analyzed roles.

use std::collections::HashSet;
use std::sync::Arc;

use jr_core::{AnalyzerConfig, Embedding, JobRoleSummary, RoleId};
use jr_storage::RoleStore;
use jr_vectordb::{IndexBackend, VectorDbError, VectorIndex};
use tracing::{debug, info, warn};

use crate::embedding::EmbeddingProvider;
use crate::error::{AnalyzerError, Result};

/// A previously analyzed role close enough to the query.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatch {
    pub role: JobRoleSummary,
    /// Cosine similarity in [-1, 1].
    pub score: f32,
}

enum IndexState {
    /// The store has not been read yet.
    Uninitialized,
    /// Bootstrapped, but nothing with an embedding exists yet. The first
    /// `add_to_index` pins the dimension.
    NoIndex,
    Ready(Box<dyn VectorIndex>),
}

/// Bridges the role store, the embedding provider and the vector index.
///
/// `roles[i]` always describes row `i` of the index. Nothing is ever removed.
/// Methods take `&mut self`; callers sharing a checker must serialize access.
pub struct SimilarityChecker {
    store: Arc<dyn RoleStore>,
    embedder: Arc<dyn EmbeddingProvider>,
    config: AnalyzerConfig,
    backend: IndexBackend,
    state: IndexState,
    roles: Vec<JobRoleSummary>,
    indexed: HashSet<RoleId>,
}

impl SimilarityChecker {
    /// Fails with `UnsupportedBackend` unless the configured backend is `"flat"`.
    /// The store is not touched until `ensure_index_initialized`.
    pub fn new(
        store: Arc<dyn RoleStore>,
        embedder: Arc<dyn EmbeddingProvider>,
        config: AnalyzerConfig,
    ) -> Result<Self> {
        config.validate()?;
        let backend = IndexBackend::from_name(&config.similarity_backend)?;
        Ok(Self::with_backend(store, embedder, config, backend))
    }

    /// Use an explicit backend, bypassing name resolution.
    pub fn with_backend(
        store: Arc<dyn RoleStore>,
        embedder: Arc<dyn EmbeddingProvider>,
        config: AnalyzerConfig,
        backend: IndexBackend,
    ) -> Self {
        Self {
            store,
            embedder,
            config,
            backend,
            state: IndexState::Uninitialized,
            roles: Vec::new(),
            indexed: HashSet::new(),
        }
    }

    pub fn backend(&self) -> IndexBackend {
        self.backend
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Whether the store has been read.
    pub fn is_initialized(&self) -> bool {
        !matches!(self.state, IndexState::Uninitialized)
    }

    /// Whether a vector index exists (at least one role has been indexed).
    pub fn has_index(&self) -> bool {
        matches!(self.state, IndexState::Ready(_))
    }

    /// Number of indexed roles.
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Pinned embedding dimension, if any role has been indexed.
    pub fn dimension(&self) -> Option<usize> {
        match &self.state {
            IndexState::Ready(index) => index.dimension(),
            _ => None,
        }
    }

    /// Load every persisted role with a non-empty embedding. Runs once; later
    /// calls are no-ops. On failure the checker stays uninitialized.
    pub async fn ensure_index_initialized(&mut self) -> Result<()> {
        if self.is_initialized() {
            return Ok(());
        }
        let rows = self.store.iter_all_embeddings().await?;
        let total = rows.len();
        let (roles, vectors): (Vec<JobRoleSummary>, Vec<Embedding>) =
            rows.into_iter().filter(|(_, v)| !v.is_empty()).unzip();

        if vectors.is_empty() {
            info!(rows = total, "no stored embeddings, similarity index not created");
            self.state = IndexState::NoIndex;
            return Ok(());
        }

        let index = self.backend.build();
        index.insert(&vectors)?;
        info!(
            indexed = roles.len(),
            skipped = total - roles.len(),
            dimension = ?index.dimension(),
            backend = %self.backend,
            "similarity index bootstrapped"
        );
        self.indexed = roles.iter().map(|r| r.job_role_id).collect();
        self.roles = roles;
        self.state = IndexState::Ready(index);
        Ok(())
    }

    /// Embed `text` with the configured provider.
    ///
    /// Non-finite components are rejected here, before anything is persisted.
    pub async fn compute_embedding(&self, text: &str) -> Result<Embedding> {
        let embedding = self
            .embedder
            .embed(text)
            .await
            .map_err(AnalyzerError::Embedding)?;
        jr_vectordb::ensure_finite(&embedding)?;
        Ok(embedding)
    }

    /// Best stored role at or above the threshold for `text`.
    pub async fn find_similar_role(&mut self, text: &str) -> Result<Option<SimilarityMatch>> {
        self.ensure_index_initialized().await?;
        if !self.has_index() {
            return Ok(None);
        }
        let embedding = self.compute_embedding(text).await?;
        self.find_similar_embedding(&embedding).await
    }

    /// Same as `find_similar_role` for an already computed embedding.
    ///
    /// An empty embedding or a missing index yields `None`. A dimension that
    /// differs from the index is an error, never a silent miss.
    pub async fn find_similar_embedding(
        &mut self,
        embedding: &[f32],
    ) -> Result<Option<SimilarityMatch>> {
        self.ensure_index_initialized().await?;
        if embedding.is_empty() {
            return Ok(None);
        }
        let IndexState::Ready(index) = &self.state else {
            return Ok(None);
        };

        let result = index.search_one(embedding, 1)?;
        let Some((position, score)) = result.best() else {
            return Ok(None);
        };
        if !self.config.is_match(score) {
            debug!(score, threshold = self.config.job_role_similarity_threshold, "best candidate below threshold");
            return Ok(None);
        }
        match self.roles.get(position) {
            Some(role) => {
                debug!(role_id = %role.job_role_id, score, "similar role found");
                Ok(Some(SimilarityMatch { role: role.clone(), score }))
            }
            None => {
                warn!(position, roles = self.roles.len(), "index position has no cached role");
                Ok(None)
            }
        }
    }

    /// Index `role` under `embedding`.
    ///
    /// The first embedding pins the dimension; later mismatches fail and leave
    /// the index untouched. An empty embedding is a no-op, so such a role can
    /// never be matched. A role already indexed is skipped.
    pub async fn add_to_index(&mut self, role: &JobRoleSummary, embedding: &[f32]) -> Result<()> {
        if embedding.is_empty() {
            debug!(role_id = %role.job_role_id, "empty embedding, role not indexed");
            return Ok(());
        }
        self.ensure_index_initialized().await?;
        if self.indexed.contains(&role.job_role_id) {
            debug!(role_id = %role.job_role_id, "role already indexed");
            return Ok(());
        }

        let vector = vec![embedding.to_vec()];
        match &self.state {
            IndexState::Ready(index) => {
                if let Some(expected) = index.dimension() {
                    if expected != embedding.len() {
                        return Err(VectorDbError::DimensionMismatch {
                            expected,
                            got: embedding.len(),
                        }
                        .into());
                    }
                }
                index.insert(&vector)?;
            }
            IndexState::Uninitialized | IndexState::NoIndex => {
                let index = self.backend.build();
                index.insert(&vector)?;
                info!(dimension = embedding.len(), backend = %self.backend, "similarity index created");
                self.state = IndexState::Ready(index);
            }
        }
        self.roles.push(role.clone());
        self.indexed.insert(role.job_role_id);
        Ok(())
    }
}
