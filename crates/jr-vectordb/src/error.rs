use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum VectorDbError {
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
    #[error("Unsupported similarity backend: {0:?} (only \"flat\" is supported)")]
    UnsupportedBackend(String),
    #[error("Invalid vector: {0}")]
    InvalidVector(String),
}

pub type Result<T> = std::result::Result<T, VectorDbError>;
