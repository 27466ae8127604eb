//! Vector index implementations: contiguous matrix and linear-scan fallback.

#[cfg(feature = "flat-matrix")]
mod flat;
mod linear;
mod traits;

#[cfg(feature = "flat-matrix")]
pub use flat::FlatIndex;
pub use linear::LinearScanIndex;
pub use traits::VectorIndex;

use crate::error::{Result, VectorDbError};

/// Position reported for padding slots that hold no candidate.
pub const SENTINEL_ID: i64 = -1;

/// Top-k result for one query: (id, score) pairs sorted by descending score.
///
/// Always holds exactly `k` entries; missing candidates are padded with
/// `(SENTINEL_ID, 0.0)`.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub ids: Vec<i64>,
    pub scores: Vec<f32>,
}

impl SearchResult {
    /// `k` sentinel pairs.
    pub fn sentinels(k: usize) -> Self {
        Self {
            ids: vec![SENTINEL_ID; k],
            scores: vec![0.0; k],
        }
    }

    pub(crate) fn from_ranked(ranked: impl IntoIterator<Item = (usize, f32)>, k: usize) -> Self {
        let mut out = Self {
            ids: Vec::with_capacity(k),
            scores: Vec::with_capacity(k),
        };
        for (idx, score) in ranked.into_iter().take(k) {
            out.ids.push(idx as i64);
            out.scores.push(score);
        }
        while out.ids.len() < k {
            out.ids.push(SENTINEL_ID);
            out.scores.push(0.0);
        }
        out
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Best genuine hit as (position, score), or `None` when the top slot is a sentinel.
    pub fn best(&self) -> Option<(usize, f32)> {
        match (self.ids.first(), self.scores.first()) {
            (Some(&id), Some(&score)) if id != SENTINEL_ID => Some((id as usize, score)),
            _ => None,
        }
    }

    /// Iterate (id, score) pairs, sentinels included.
    pub fn iter(&self) -> impl Iterator<Item = (i64, f32)> + '_ {
        self.ids.iter().copied().zip(self.scores.iter().copied())
    }
}

/// Validate a batch against the pinned dimension, or pin it from the first vector.
///
/// Returns the dimension the batch conforms to. Nothing is mutated, so a failing
/// batch leaves the caller's index untouched.
pub(crate) fn check_batch(pinned: Option<usize>, vectors: &[Vec<f32>]) -> Result<Option<usize>> {
    let Some(expected) = pinned.or_else(|| vectors.first().map(Vec::len)) else {
        return Ok(None);
    };
    if expected == 0 {
        return Err(VectorDbError::InvalidVector(
            "cannot index zero-length vectors".into(),
        ));
    }
    for v in vectors {
        check_vector(expected, v)?;
    }
    Ok(Some(expected))
}

/// Dimension and finiteness check for one stored row or query.
#[inline]
pub(crate) fn check_vector(expected: usize, v: &[f32]) -> Result<()> {
    if v.len() != expected {
        return Err(VectorDbError::DimensionMismatch {
            expected,
            got: v.len(),
        });
    }
    ensure_finite(v)
}

/// Reject NaN and infinite components. Such values have no cosine score and
/// would rank differently across backends.
pub fn ensure_finite(v: &[f32]) -> Result<()> {
    match v.iter().position(|x| !x.is_finite()) {
        Some(pos) => Err(VectorDbError::InvalidVector(format!(
            "non-finite component {} at position {pos}",
            v[pos]
        ))),
        None => Ok(()),
    }
}
