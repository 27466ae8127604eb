//! Job role deduplication.
//!
//! Incoming descriptions are embedded and compared against every role analyzed
//! so far. A close enough match is returned as is; otherwise the LLM
//! extraction pipeline runs and the new role is persisted and indexed.

pub mod analyzer;
pub mod embedding;
pub mod error;
pub mod llm;
pub mod similarity;

pub use analyzer::{Analysis, AnalyzeRequest, DedupDecision, JobRoleAnalyzer};
pub use embedding::{EmbeddingProvider, HashingEmbeddingProvider};
pub use error::{AnalyzerError, Result};
pub use llm::{parse_competencies, LlmInterface, PromptKind};
pub use similarity::{SimilarityChecker, SimilarityMatch};
