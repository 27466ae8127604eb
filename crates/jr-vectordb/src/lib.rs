//! Exact cosine-similarity vector index.
//!
//! Provides a contiguous-matrix backend (`FlatIndex`) and a pure linear-scan
//! fallback (`LinearScanIndex`) behind the same `VectorIndex` trait, plus the
//! name-based backend selection used by configuration.

pub mod backend;
pub mod distance;
pub mod error;
pub mod index;

pub use backend::IndexBackend;
pub use error::{Result, VectorDbError};
#[cfg(feature = "flat-matrix")]
pub use index::FlatIndex;
pub use index::{ensure_finite, LinearScanIndex, SearchResult, VectorIndex, SENTINEL_ID};
