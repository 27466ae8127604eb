use chrono::{DateTime, Utc};
use jr_core::{Competency, Embedding, JobRoleSummary, JobRoleWithCompetencies};
use serde::{Deserialize, Serialize};

/// Persisted row: the full record plus its embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredRole {
    pub job_role: JobRoleSummary,
    pub competencies: Vec<Competency>,
    /// Empty for legacy rows that were never embedded.
    #[serde(default)]
    pub embedding: Embedding,
    /// Store-assigned insertion sequence. Zero on rows written before it existed.
    #[serde(default)]
    pub seq: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoredRole {
    pub fn new(record: &JobRoleWithCompetencies, embedding: &[f32], seq: u64) -> Self {
        let now = Utc::now();
        Self {
            job_role: record.job_role.clone(),
            competencies: record.competencies.clone(),
            embedding: embedding.to_vec(),
            seq,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace contents, keeping the original creation time and sequence.
    pub fn replace(&mut self, record: &JobRoleWithCompetencies, embedding: &[f32]) {
        self.job_role = record.job_role.clone();
        self.competencies = record.competencies.clone();
        self.embedding = embedding.to_vec();
        self.updated_at = Utc::now();
    }

    pub fn to_record(&self) -> JobRoleWithCompetencies {
        JobRoleWithCompetencies::new(self.job_role.clone(), self.competencies.clone())
    }
}
