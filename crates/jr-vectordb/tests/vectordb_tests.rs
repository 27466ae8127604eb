//! Behavioural tests for jr-vectordb.
//! Every index scenario runs against each compiled backend.

use jr_vectordb::{
    distance,
    error::VectorDbError,
    index::{LinearScanIndex, SearchResult, VectorIndex, SENTINEL_ID},
    IndexBackend,
};
#[cfg(feature = "flat-matrix")]
use jr_vectordb::index::FlatIndex;
use rand::{rngs::StdRng, Rng, SeedableRng};

fn backends() -> Vec<Box<dyn VectorIndex>> {
    let mut all: Vec<Box<dyn VectorIndex>> = vec![Box::new(LinearScanIndex::new())];
    #[cfg(feature = "flat-matrix")]
    all.push(Box::new(FlatIndex::new()));
    all
}

fn random_vectors(rng: &mut StdRng, n: usize, dim: usize) -> Vec<Vec<f32>> {
    (0..n)
        .map(|_| (0..dim).map(|_| rng.gen_range(-1.0f32..1.0)).collect())
        .collect()
}

// ============================================================
// Distance
// ============================================================

#[test]
fn test_inner_product() {
    let a = vec![1.0, 2.0, 3.0];
    let b = vec![4.0, 5.0, 6.0];
    assert!((distance::inner_product(&a, &b) - 32.0).abs() < 1e-6);
}

#[test]
fn test_cosine_similarity_identical() {
    let a = vec![1.0, 2.0, 3.0];
    assert!((distance::cosine_similarity(&a, &a) - 1.0).abs() < 1e-6);
}

#[test]
fn test_cosine_similarity_orthogonal() {
    assert!(distance::cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
}

#[test]
fn test_cosine_similarity_zero_vector() {
    assert_eq!(distance::cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
}

#[test]
fn test_normalize_vector() {
    let mut v = vec![3.0, 4.0];
    distance::normalize_vector(&mut v);
    assert!((v[0] - 0.6).abs() < 1e-6);
    assert!((v[1] - 0.8).abs() < 1e-6);
}

#[test]
fn test_normalize_zero_vector() {
    let mut v = vec![0.0, 0.0, 0.0];
    distance::normalize_vector(&mut v);
    assert_eq!(v, vec![0.0, 0.0, 0.0]);
}

// ============================================================
// Index behaviour (all backends)
// ============================================================

#[test]
fn test_self_match_scores_one() {
    for idx in backends() {
        idx.insert(&[vec![0.2, 0.5, -0.1], vec![3.0, 1.0, 2.0]]).unwrap();
        let res = idx.search_one(&[3.0, 1.0, 2.0], 1).unwrap();
        assert_eq!(res.ids, vec![1], "backend {}", idx.backend());
        assert!((res.scores[0] - 1.0).abs() < 1e-5);
    }
}

#[test]
fn test_first_insert_pins_dimension() {
    for idx in backends() {
        assert_eq!(idx.dimension(), None);
        idx.insert(&[vec![1.0, 2.0, 3.0, 4.0]]).unwrap();
        assert_eq!(idx.dimension(), Some(4));
        assert_eq!(idx.len(), 1);
    }
}

#[test]
fn test_dimension_mismatch_on_insert_leaves_index_unchanged() {
    for idx in backends() {
        idx.insert(&[vec![1.0, 0.0, 0.0]]).unwrap();
        let err = idx.insert(&[vec![1.0, 0.0, 0.0, 0.0]]).unwrap_err();
        assert_eq!(err, VectorDbError::DimensionMismatch { expected: 3, got: 4 });
        assert_eq!(idx.len(), 1);
        assert_eq!(idx.dimension(), Some(3));
    }
}

#[test]
fn test_mixed_first_batch_is_rejected_whole() {
    for idx in backends() {
        let err = idx
            .insert(&[vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0], vec![1.0, 1.0]])
            .unwrap_err();
        assert!(matches!(err, VectorDbError::DimensionMismatch { expected: 3, got: 2 }));
        assert_eq!(idx.len(), 0);
        // Nothing was pinned, so a different dimension is still accepted.
        assert_eq!(idx.dimension(), None);
        idx.insert(&[vec![1.0, 1.0]]).unwrap();
        assert_eq!(idx.dimension(), Some(2));
    }
}

#[test]
fn test_zero_length_first_vector_rejected() {
    for idx in backends() {
        let err = idx.insert(&[vec![]]).unwrap_err();
        assert!(matches!(err, VectorDbError::InvalidVector(_)));
        assert!(idx.is_empty());
    }
}

#[test]
fn test_empty_batch_is_noop() {
    for idx in backends() {
        idx.insert(&[]).unwrap();
        assert!(idx.is_empty());
        assert_eq!(idx.dimension(), None);
    }
}

#[test]
fn test_query_dimension_mismatch() {
    for idx in backends() {
        idx.insert(&[vec![1.0, 0.0, 0.0]]).unwrap();
        let err = idx.search(&[vec![1.0, 0.0]], 1).unwrap_err();
        assert_eq!(err, VectorDbError::DimensionMismatch { expected: 3, got: 2 });
    }
}

#[test]
fn test_empty_index_returns_sentinels() {
    for idx in backends() {
        let results = idx.search(&[vec![1.0, 2.0], vec![3.0, 4.0, 5.0]], 4).unwrap();
        assert_eq!(results.len(), 2);
        for r in &results {
            assert_eq!(r.ids, vec![SENTINEL_ID; 4]);
            assert_eq!(r.scores, vec![0.0; 4]);
            assert_eq!(r.best(), None);
        }
    }
}

#[test]
fn test_short_index_is_padded() {
    for idx in backends() {
        idx.insert(&[vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();
        let r = idx.search_one(&[1.0, 0.1], 5).unwrap();
        assert_eq!(r.len(), 5);
        assert_eq!(&r.ids[..2], &[0, 1]);
        assert_eq!(&r.ids[2..], &[SENTINEL_ID; 3]);
        assert_eq!(&r.scores[2..], &[0.0; 3]);
    }
}

#[test]
fn test_k_zero_returns_empty_rows() {
    for idx in backends() {
        idx.insert(&[vec![1.0, 0.0]]).unwrap();
        let results = idx.search(&[vec![1.0, 0.0], vec![0.0, 1.0]], 0).unwrap();
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(SearchResult::is_empty));
    }
}

#[test]
fn test_results_sorted_descending() {
    for idx in backends() {
        idx.insert(&[vec![0.0, 1.0], vec![1.0, 0.0], vec![0.7, 0.7], vec![-1.0, 0.0]]).unwrap();
        let r = idx.search_one(&[1.0, 0.0], 4).unwrap();
        assert_eq!(r.ids, vec![1, 2, 0, 3]);
        assert!(r.scores.windows(2).all(|w| w[0] >= w[1]));
        assert!((r.scores[3] + 1.0).abs() < 1e-6);
    }
}

#[test]
fn test_ties_prefer_earlier_insertion() {
    for idx in backends() {
        // All three normalize to the same direction.
        idx.insert(&[vec![0.0, 1.0], vec![2.0, 0.0], vec![5.0, 0.0], vec![1.0, 0.0]]).unwrap();
        let r = idx.search_one(&[1.0, 0.0], 3).unwrap();
        assert_eq!(r.ids, vec![1, 2, 3]);
    }
}

#[test]
fn test_orthogonal_ties_ignore_zero_sign() {
    for idx in backends() {
        idx.insert(&[vec![0.0, 1.0], vec![0.0, -1.0]]).unwrap();
        let r = idx.search_one(&[1.0, 0.0], 2).unwrap();
        assert_eq!(r.ids, vec![0, 1]);
    }
}

#[test]
fn test_zero_vector_scores_zero() {
    for idx in backends() {
        idx.insert(&[vec![0.0, 0.0, 0.0]]).unwrap();
        let r = idx.search_one(&[1.0, 2.0, 3.0], 1).unwrap();
        assert_eq!(r.ids, vec![0]);
        assert_eq!(r.scores, vec![0.0]);
    }
}

#[test]
fn test_zero_query_scores_zero() {
    for idx in backends() {
        idx.insert(&[vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();
        let r = idx.search_one(&[0.0, 0.0], 2).unwrap();
        assert_eq!(r.ids, vec![0, 1]);
        assert_eq!(r.scores, vec![0.0, 0.0]);
    }
}

#[test]
fn test_magnitude_does_not_affect_score() {
    for idx in backends() {
        idx.insert(&[vec![10.0, 0.0, 0.0], vec![0.0, 0.01, 0.0]]).unwrap();
        let r = idx.search_one(&[0.9, 0.1, 0.0], 1).unwrap();
        assert_eq!(r.best().map(|(i, _)| i), Some(0));
        assert!(r.scores[0] > 0.9);
    }
}

#[test]
fn test_scores_within_unit_range() {
    let mut rng = StdRng::seed_from_u64(7);
    let data = random_vectors(&mut rng, 300, 24);
    let queries = random_vectors(&mut rng, 20, 24);
    for idx in backends() {
        idx.insert(&data).unwrap();
        idx.insert(&queries).unwrap();
        for r in idx.search(&queries, 50).unwrap() {
            for &s in &r.scores {
                assert!((-1.0..=1.0).contains(&s), "score {s} out of range");
            }
        }
    }
}

#[test]
fn test_incremental_inserts_keep_positions() {
    for idx in backends() {
        idx.insert(&[vec![1.0, 0.0, 0.0]]).unwrap();
        idx.insert(&[vec![0.0, 1.0, 0.0], vec![0.0, 0.0, 1.0]]).unwrap();
        assert_eq!(idx.len(), 3);
        assert_eq!(idx.search_one(&[0.0, 0.0, 2.0], 1).unwrap().ids, vec![2]);
        assert_eq!(idx.search_one(&[0.0, 3.0, 0.0], 1).unwrap().ids, vec![1]);
    }
}

#[test]
fn test_extreme_magnitudes_self_match() {
    let cases = [
        vec![1e20, 0.0, 0.0],
        vec![1e-30, 0.0, 0.0],
        vec![3e19, 4e19, 0.0],
        vec![-2e-40, 0.0, 5e-41],
    ];
    for v in cases {
        for idx in backends() {
            idx.insert(&[vec![0.0, 1.0, 0.0], v.clone()]).unwrap();
            let r = idx.search_one(&v, 1).unwrap();
            assert_eq!(r.ids, vec![1], "backend {} vector {v:?}", idx.backend());
            assert!((r.scores[0] - 1.0).abs() < 1e-5, "score {} for {v:?}", r.scores[0]);
        }
        assert!((distance::cosine_similarity(&v, &v) - 1.0).abs() < 1e-5);
    }
}

#[test]
fn test_non_finite_rows_rejected() {
    for idx in backends() {
        let err = idx.insert(&[vec![1.0, 0.0, 0.0], vec![f32::NAN, 0.0, 0.0]]).unwrap_err();
        assert!(matches!(err, VectorDbError::InvalidVector(_)), "backend {}", idx.backend());
        assert_eq!(idx.len(), 0);
        assert_eq!(idx.dimension(), None);

        idx.insert(&[vec![1.0, 0.0, 0.0]]).unwrap();
        for bad in [f32::INFINITY, f32::NEG_INFINITY, f32::NAN] {
            let err = idx.insert(&[vec![0.0, bad, 0.0]]).unwrap_err();
            assert!(matches!(err, VectorDbError::InvalidVector(_)));
        }
        assert_eq!(idx.len(), 1);
        let r = idx.search_one(&[1.0, 0.0, 0.0], 2).unwrap();
        assert_eq!(r.ids, vec![0, SENTINEL_ID]);
        assert_eq!(r.scores, vec![1.0, 0.0]);
    }
}

#[test]
fn test_non_finite_query_rejected() {
    for idx in backends() {
        idx.insert(&[vec![1.0, 0.0, 0.0]]).unwrap();
        let err = idx
            .search(&[vec![1.0, 0.0, 0.0], vec![f32::NAN, 0.0, 0.0]], 1)
            .unwrap_err();
        assert!(matches!(err, VectorDbError::InvalidVector(_)));
    }
}

#[test]
fn test_large_k_on_small_index() {
    for idx in backends() {
        idx.insert(&[vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();
        let r = idx.search_one(&[1.0, 0.0], 100_000).unwrap();
        assert_eq!(r.len(), 100_000);
        assert_eq!(&r.ids[..3], &[0, 1, SENTINEL_ID]);
    }
}

// ============================================================
// Backend equivalence
// ============================================================

#[cfg(feature = "flat-matrix")]
#[test]
fn test_backends_agree_on_random_data() {
    let mut rng = StdRng::seed_from_u64(42);
    let flat = FlatIndex::new();
    let linear = LinearScanIndex::new();
    for _ in 0..5 {
        let batch = random_vectors(&mut rng, 80, 16);
        flat.insert(&batch).unwrap();
        linear.insert(&batch).unwrap();
    }
    let queries = random_vectors(&mut rng, 25, 16);
    for k in [1, 5, 400, 450] {
        let a = flat.search(&queries, k).unwrap();
        let b = linear.search(&queries, k).unwrap();
        assert_eq!(a.len(), b.len());
        for (ra, rb) in a.iter().zip(b.iter()) {
            assert_eq!(ra.ids, rb.ids);
            for (sa, sb) in ra.scores.iter().zip(rb.scores.iter()) {
                assert!((sa - sb).abs() < 1e-6);
            }
        }
    }
}

#[cfg(feature = "flat-matrix")]
#[test]
fn test_backends_agree_with_duplicates() {
    let rows = vec![
        vec![1.0, 1.0, 0.0],
        vec![0.0, 0.0, 1.0],
        vec![2.0, 2.0, 0.0],
        vec![0.0, 0.0, 3.0],
        vec![1.0, 1.0, 0.0],
    ];
    let flat = FlatIndex::new();
    let linear = LinearScanIndex::new();
    flat.insert(&rows).unwrap();
    linear.insert(&rows).unwrap();
    for q in [vec![1.0, 1.0, 0.0], vec![0.0, 0.0, 1.0], vec![1.0, 1.0, 1.0]] {
        assert_eq!(flat.search_one(&q, 5).unwrap(), linear.search_one(&q, 5).unwrap());
    }
}

// ============================================================
// Backend selection
// ============================================================

#[test]
fn test_backend_from_name() {
    for name in ["flat", "FLAT", " Flat "] {
        assert_eq!(IndexBackend::from_name(name).unwrap(), IndexBackend::preferred());
    }
}

#[test]
fn test_backend_rejects_unknown_names() {
    for name in ["hnsw", "ivf", ""] {
        let err = IndexBackend::from_name(name).unwrap_err();
        assert_eq!(err, VectorDbError::UnsupportedBackend(name.to_string()));
    }
}

#[test]
fn test_backend_build_reports_kind() {
    let idx = IndexBackend::LinearScan.build();
    assert_eq!(idx.backend(), IndexBackend::LinearScan);
    let preferred = IndexBackend::preferred().build();
    assert_eq!(preferred.backend(), IndexBackend::preferred());
    assert!(preferred.is_empty());
}

#[test]
fn test_backend_display() {
    assert_eq!(IndexBackend::Flat.to_string(), "flat");
    assert_eq!(IndexBackend::LinearScan.to_string(), "linear_scan");
}
