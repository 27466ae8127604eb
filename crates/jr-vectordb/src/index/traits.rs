use crate::backend::IndexBackend;
use crate::error::Result;
use super::SearchResult;

/// Core trait for vector index implementations.
///
/// Every backend must behave identically: same scores, same tie-break by
/// insertion order, same sentinel padding.
pub trait VectorIndex: Send + Sync {
    /// Append vectors in call order. The first vector ever inserted pins the
    /// dimension. The batch is validated as a whole before anything is stored.
    fn insert(&self, vectors: &[Vec<f32>]) -> Result<()>;

    /// Top-k search for each query. Each result has exactly `k` entries.
    fn search(&self, queries: &[Vec<f32>], k: usize) -> Result<Vec<SearchResult>>;

    /// Search a single query.
    fn search_one(&self, query: &[f32], k: usize) -> Result<SearchResult> {
        let mut results = self.search(&[query.to_vec()], k)?;
        Ok(results.pop().unwrap_or_else(|| SearchResult::sentinels(k)))
    }

    /// Number of stored vectors.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pinned dimension, `None` until the first successful insert.
    fn dimension(&self) -> Option<usize>;

    fn backend(&self) -> IndexBackend;
}
