use parking_lot::RwLock;
use tracing::debug;

use crate::backend::IndexBackend;
use crate::distance;
use crate::error::Result;
use super::{check_batch, check_vector, traits::VectorIndex, SearchResult};

/// Pure linear-scan fallback.
/// Scores every stored vector and sorts them; no external dependencies.
pub struct LinearScanIndex {
    inner: RwLock<LinearInner>,
}

struct LinearInner {
    dimension: Option<usize>,
    vectors: Vec<Vec<f32>>,
}

impl LinearScanIndex {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(LinearInner {
                dimension: None,
                vectors: Vec::new(),
            }),
        }
    }
}

impl Default for LinearScanIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl VectorIndex for LinearScanIndex {
    fn insert(&self, vectors: &[Vec<f32>]) -> Result<()> {
        let mut inner = self.inner.write();
        let Some(dim) = check_batch(inner.dimension, vectors)? else {
            return Ok(());
        };
        inner
            .vectors
            .extend(vectors.iter().map(|v| distance::normalized(v)));
        inner.dimension = Some(dim);
        debug!(added = vectors.len(), total = inner.vectors.len(), dimension = dim, "linear index insert");
        Ok(())
    }

    fn search(&self, queries: &[Vec<f32>], k: usize) -> Result<Vec<SearchResult>> {
        let inner = self.inner.read();
        let dim = match inner.dimension {
            Some(dim) if !inner.vectors.is_empty() => dim,
            _ => return Ok(queries.iter().map(|_| SearchResult::sentinels(k)).collect()),
        };
        for q in queries {
            check_vector(dim, q)?;
        }
        Ok(queries
            .iter()
            .map(|q| {
                let query = distance::normalized(q);
                let mut scored: Vec<(usize, f32)> = inner
                    .vectors
                    .iter()
                    .enumerate()
                    .map(|(idx, v)| (idx, distance::score_normalized(&query, v)))
                    .collect();
                // Stable sort: equal scores keep insertion order.
                scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
                SearchResult::from_ranked(scored, k)
            })
            .collect())
    }

    fn len(&self) -> usize {
        self.inner.read().vectors.len()
    }

    fn dimension(&self) -> Option<usize> {
        self.inner.read().dimension
    }

    fn backend(&self) -> IndexBackend {
        IndexBackend::LinearScan
    }
}
