use jr_core::CoreError;
use jr_vectordb::VectorDbError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error(transparent)]
    VectorDb(#[from] VectorDbError),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("Embedding provider failed: {0:#}")]
    Embedding(anyhow::Error),
    #[error("LLM call failed: {0:#}")]
    Llm(anyhow::Error),
    #[error("Invalid competency payload: {0}")]
    CompetencyPayload(String),
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;
