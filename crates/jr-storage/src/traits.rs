use async_trait::async_trait;
use jr_core::{Embedding, JobRoleSummary, JobRoleWithCompetencies, Result, RoleId};

/// Read/write contract of the role store.
#[async_trait]
pub trait RoleStore: Send + Sync {
    /// Every role with its embedding, in store iteration order.
    /// Legacy rows carry an empty vector.
    async fn iter_all_embeddings(&self) -> Result<Vec<(JobRoleSummary, Embedding)>>;

    /// Full record by identity.
    async fn fetch_by_id(&self, id: RoleId) -> Result<Option<JobRoleWithCompetencies>>;

    /// Insert or replace by identity. Competencies are replaced wholesale.
    async fn upsert(&self, record: &JobRoleWithCompetencies, embedding: &[f32]) -> Result<()>;

    /// Remove a role. Returns whether it existed.
    async fn delete(&self, id: RoleId) -> Result<bool>;

    async fn count(&self) -> Result<usize>;
}
