//! Check-then-create coordination.

use std::sync::Arc;

use jr_core::{AnalyzerConfig, JobRoleSummary, JobRoleWithCompetencies, RoleId};
use jr_storage::RoleStore;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::embedding::EmbeddingProvider;
use crate::error::{AnalyzerError, Result};
use crate::llm::{parse_competencies, LlmInterface, PromptKind};
use crate::similarity::SimilarityChecker;

/// One role description to analyze.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub job_title: String,
    pub job_description: String,
    pub years_of_experience: u32,
}

impl AnalyzeRequest {
    pub fn new(
        job_title: impl Into<String>,
        job_description: impl Into<String>,
        years_of_experience: u32,
    ) -> Self {
        Self {
            job_title: job_title.into(),
            job_description: job_description.into(),
            years_of_experience,
        }
    }
}

/// How a request was resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DedupDecision {
    /// An existing role was returned without running extraction.
    Reused { matched: RoleId, score: f32 },
    /// Extraction ran and a new role was persisted.
    Created,
}

impl DedupDecision {
    pub fn is_reused(&self) -> bool {
        matches!(self, Self::Reused { .. })
    }
}

#[derive(Debug, Clone)]
pub struct Analysis {
    pub record: JobRoleWithCompetencies,
    pub decision: DedupDecision,
}

/// Reuses a stored role when a near-duplicate exists, otherwise runs the LLM
/// pipeline and persists the result.
///
/// The whole decide-and-commit sequence (search, store write, index write)
/// runs under one lock, so concurrent near-duplicates produce one record.
pub struct JobRoleAnalyzer {
    store: Arc<dyn RoleStore>,
    llm: Arc<dyn LlmInterface>,
    checker: Mutex<SimilarityChecker>,
    config: AnalyzerConfig,
}

impl JobRoleAnalyzer {
    pub fn new(
        store: Arc<dyn RoleStore>,
        llm: Arc<dyn LlmInterface>,
        embedder: Arc<dyn EmbeddingProvider>,
        config: AnalyzerConfig,
    ) -> Result<Self> {
        let checker = SimilarityChecker::new(store.clone(), embedder, config.clone())?;
        Ok(Self {
            store,
            llm,
            checker: Mutex::new(checker),
            config,
        })
    }

    /// Bootstrap the similarity index now instead of on the first request.
    pub async fn initialize(&self) -> Result<()> {
        self.checker.lock().await.ensure_index_initialized().await
    }

    /// Number of roles currently searchable.
    pub async fn indexed_roles(&self) -> usize {
        self.checker.lock().await.len()
    }

    pub async fn analyze(&self, request: &AnalyzeRequest) -> Result<Analysis> {
        let mut checker = self.checker.lock().await;

        let embedding = checker.compute_embedding(&request.job_description).await?;
        if let Some(found) = checker.find_similar_embedding(&embedding).await? {
            let matched = found.role.job_role_id;
            match self.store.fetch_by_id(matched).await? {
                Some(record) => {
                    info!(role_id = %matched, score = found.score, "reusing existing role");
                    return Ok(Analysis {
                        record,
                        decision: DedupDecision::Reused { matched, score: found.score },
                    });
                }
                None => {
                    warn!(role_id = %matched, score = found.score, "matched role missing from store, creating a new one");
                }
            }
        }

        let record = self.extract(request).await?;
        self.store.upsert(&record, &embedding).await?;
        checker.add_to_index(&record.job_role, &embedding).await?;
        info!(role_id = %record.id(), title = %record.job_role.job_title, "created new role");

        Ok(Analysis {
            record,
            decision: DedupDecision::Created,
        })
    }

    /// Normalization then competency extraction.
    async fn extract(&self, request: &AnalyzeRequest) -> Result<JobRoleWithCompetencies> {
        let vars = json!({
            "job_title": request.job_title,
            "job_description": request.job_description,
            "years_of_experience": request.years_of_experience,
        });
        let summary = self
            .llm
            .run_prompt(PromptKind::NormalizeJd, &vars)
            .await
            .map_err(AnalyzerError::Llm)?
            .trim()
            .to_string();

        let vars = json!({
            "job_title": request.job_title,
            "normalized_summary": summary,
            "years_of_experience": request.years_of_experience,
            "job_description": request.job_description,
        });
        let payload = self
            .llm
            .run_prompt(PromptKind::ExtractCompetencies, &vars)
            .await
            .map_err(AnalyzerError::Llm)?;
        let competencies = parse_competencies(
            &payload,
            self.config.min_competencies,
            self.config.max_competencies,
        )?;

        let job_role = JobRoleSummary::new(
            request.job_title.clone(),
            summary,
            request.years_of_experience,
        );
        Ok(JobRoleWithCompetencies::new(job_role, competencies))
    }
}
