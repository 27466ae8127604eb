//! Name-based backend selection.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Result, VectorDbError};
#[cfg(feature = "flat-matrix")]
use crate::index::FlatIndex;
use crate::index::{LinearScanIndex, VectorIndex};

/// Configured name of the only supported backend.
pub const FLAT_BACKEND: &str = "flat";

/// Concrete index implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexBackend {
    /// Contiguous matrix with bounded top-k.
    Flat,
    /// Pure linear scan, used when the flat backend is compiled out.
    LinearScan,
}

impl fmt::Display for IndexBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flat => write!(f, "flat"),
            Self::LinearScan => write!(f, "linear_scan"),
        }
    }
}

impl IndexBackend {
    /// Resolve a configured backend name.
    ///
    /// Only `"flat"` (any case) is accepted. When the `flat-matrix` feature is
    /// disabled it resolves to the linear-scan fallback.
    pub fn from_name(name: &str) -> Result<Self> {
        if !name.trim().eq_ignore_ascii_case(FLAT_BACKEND) {
            return Err(VectorDbError::UnsupportedBackend(name.to_string()));
        }
        Ok(Self::preferred())
    }

    /// Best backend compiled into this build.
    pub fn preferred() -> Self {
        if cfg!(feature = "flat-matrix") {
            Self::Flat
        } else {
            warn!("flat-matrix backend unavailable, falling back to linear scan");
            Self::LinearScan
        }
    }

    /// Create an empty index of this kind.
    pub fn build(self) -> Box<dyn VectorIndex> {
        match self {
            #[cfg(feature = "flat-matrix")]
            Self::Flat => Box::new(FlatIndex::new()),
            #[cfg(not(feature = "flat-matrix"))]
            Self::Flat => Box::new(LinearScanIndex::new()),
            Self::LinearScan => Box::new(LinearScanIndex::new()),
        }
    }
}
