//! Vector math shared by every backend.
//!
//! Both backends score through these functions so that their results agree
//! bit for bit.

/// Compute inner product (dot product) of two vectors.
#[inline]
pub fn inner_product(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Euclidean norm, accumulated in f64.
///
/// Squaring in f32 overflows above ~1e19 and underflows below ~1e-23, which
/// would turn a perfectly good vector into a zero one.
#[inline]
pub fn l2_norm_f64(v: &[f32]) -> f64 {
    v.iter()
        .map(|&x| {
            let x = f64::from(x);
            x * x
        })
        .sum::<f64>()
        .sqrt()
}

/// Euclidean norm.
#[inline]
pub fn l2_norm(v: &[f32]) -> f32 {
    l2_norm_f64(v) as f32
}

/// Compute cosine similarity (returns value in [-1, 1]).
#[inline]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    let norm_a = l2_norm_f64(a);
    let norm_b = l2_norm_f64(b);
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    let dot: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(&x, &y)| (f64::from(x) / norm_a) * (f64::from(y) / norm_b))
        .sum();
    clamp_score(dot as f32)
}

/// Normalize a vector in-place (L2 normalization). The zero vector is left as is.
pub fn normalize_vector(v: &mut [f32]) {
    let norm = l2_norm_f64(v);
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x = (f64::from(*x) / norm) as f32;
        }
    }
}

/// Owned, normalized copy of `v`.
pub fn normalized(v: &[f32]) -> Vec<f32> {
    let mut out = v.to_vec();
    normalize_vector(&mut out);
    out
}

/// Rounding can push a normalized dot product slightly past unit length.
#[inline]
pub fn clamp_score(score: f32) -> f32 {
    score.clamp(-1.0, 1.0)
}

/// Score of a normalized query against a normalized stored row.
#[inline]
pub fn score_normalized(query: &[f32], row: &[f32]) -> f32 {
    clamp_score(inner_product(query, row))
}
