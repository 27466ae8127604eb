use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;
use parking_lot::RwLock;
use tracing::debug;

use crate::backend::IndexBackend;
use crate::distance;
use crate::error::Result;
use super::{check_batch, check_vector, traits::VectorIndex, SearchResult};

/// Contiguous-matrix exact index.
///
/// Rows live back to back in one `Vec<f32>`; search keeps a bounded min-heap
/// of the best `k` rows instead of sorting every score.
pub struct FlatIndex {
    inner: RwLock<FlatInner>,
}

struct FlatInner {
    dimension: Option<usize>,
    /// Row-major normalized vectors, `rows * dimension` values.
    data: Vec<f32>,
    rows: usize,
}

/// Heap key: higher score wins, then lower row.
type RankKey = (OrderedFloat<f32>, Reverse<usize>);

impl FlatIndex {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Reserve room for `capacity` values (not rows; the dimension is unknown yet).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: RwLock::new(FlatInner {
                dimension: None,
                data: Vec::with_capacity(capacity),
                rows: 0,
            }),
        }
    }

    fn top_k(inner: &FlatInner, dim: usize, query: &[f32], k: usize) -> SearchResult {
        let mut heap: BinaryHeap<Reverse<RankKey>> =
            BinaryHeap::with_capacity(k.min(inner.rows) + 1);
        for (row_idx, row) in inner.data.chunks_exact(dim).enumerate() {
            let key = (
                OrderedFloat(distance::score_normalized(query, row)),
                Reverse(row_idx),
            );
            if heap.len() < k {
                heap.push(Reverse(key));
            } else if let Some(Reverse(worst)) = heap.peek() {
                if key > *worst {
                    heap.pop();
                    heap.push(Reverse(key));
                }
            }
        }
        // Ascending order of Reverse<key> is descending order of key.
        let ranked = heap
            .into_sorted_vec()
            .into_iter()
            .map(|Reverse((score, Reverse(idx)))| (idx, score.into_inner()));
        SearchResult::from_ranked(ranked, k)
    }
}

impl Default for FlatIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl VectorIndex for FlatIndex {
    fn insert(&self, vectors: &[Vec<f32>]) -> Result<()> {
        let mut inner = self.inner.write();
        let Some(dim) = check_batch(inner.dimension, vectors)? else {
            return Ok(());
        };
        inner.data.reserve(vectors.len() * dim);
        for v in vectors {
            let start = inner.data.len();
            inner.data.extend_from_slice(v);
            distance::normalize_vector(&mut inner.data[start..]);
        }
        inner.rows += vectors.len();
        inner.dimension = Some(dim);
        debug!(added = vectors.len(), total = inner.rows, dimension = dim, "flat index insert");
        Ok(())
    }

    fn search(&self, queries: &[Vec<f32>], k: usize) -> Result<Vec<SearchResult>> {
        let inner = self.inner.read();
        let dim = match inner.dimension {
            Some(dim) if inner.rows > 0 => dim,
            _ => return Ok(queries.iter().map(|_| SearchResult::sentinels(k)).collect()),
        };
        for q in queries {
            check_vector(dim, q)?;
        }
        Ok(queries
            .iter()
            .map(|q| {
                if k == 0 {
                    return SearchResult::sentinels(0);
                }
                let query = distance::normalized(q);
                Self::top_k(&inner, dim, &query, k)
            })
            .collect())
    }

    fn len(&self) -> usize {
        self.inner.read().rows
    }

    fn dimension(&self) -> Option<usize> {
        self.inner.read().dimension
    }

    fn backend(&self) -> IndexBackend {
        IndexBackend::Flat
    }
}
