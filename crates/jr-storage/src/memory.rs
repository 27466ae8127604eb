use std::collections::HashMap;

use async_trait::async_trait;
use jr_core::{Embedding, JobRoleSummary, JobRoleWithCompetencies, Result, RoleId};
use parking_lot::RwLock;

use crate::record::StoredRole;
use crate::traits::RoleStore;

/// In-memory store. Iterates in first-insertion order.
pub struct MemoryRoleStore {
    inner: RwLock<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    order: Vec<RoleId>,
    rows: HashMap<RoleId, StoredRole>,
    next_seq: u64,
}

impl MemoryRoleStore {
    pub fn new() -> Self {
        Self { inner: RwLock::new(MemoryInner::default()) }
    }
}

impl Default for MemoryRoleStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoleStore for MemoryRoleStore {
    async fn iter_all_embeddings(&self) -> Result<Vec<(JobRoleSummary, Embedding)>> {
        let inner = self.inner.read();
        Ok(inner
            .order
            .iter()
            .filter_map(|id| inner.rows.get(id))
            .map(|row| (row.job_role.clone(), row.embedding.clone()))
            .collect())
    }

    async fn fetch_by_id(&self, id: RoleId) -> Result<Option<JobRoleWithCompetencies>> {
        Ok(self.inner.read().rows.get(&id).map(StoredRole::to_record))
    }

    async fn upsert(&self, record: &JobRoleWithCompetencies, embedding: &[f32]) -> Result<()> {
        let mut inner = self.inner.write();
        let id = record.id();
        if let Some(row) = inner.rows.get_mut(&id) {
            row.replace(record, embedding);
        } else {
            let seq = inner.next_seq;
            inner.next_seq += 1;
            inner.order.push(id);
            inner.rows.insert(id, StoredRole::new(record, embedding, seq));
        }
        Ok(())
    }

    async fn delete(&self, id: RoleId) -> Result<bool> {
        let mut inner = self.inner.write();
        if inner.rows.remove(&id).is_none() {
            return Ok(false);
        }
        inner.order.retain(|o| *o != id);
        Ok(true)
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.inner.read().rows.len())
    }
}
