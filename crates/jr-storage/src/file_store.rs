//! Directory-backed role store: one JSON document per role.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use jr_core::{
    AnalyzerConfig, CoreError, Embedding, JobRoleSummary, JobRoleWithCompetencies, Result, RoleId,
};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::record::StoredRole;
use crate::traits::RoleStore;

const ROLES_DIR: &str = "roles";

/// Stores each role as `<root>/roles/<uuid>.json`, written atomically.
///
/// Iteration order is first-insertion order, kept across restarts by a
/// per-row sequence number. Rows written before sequencing existed fall back
/// to `(created_at, id)`.
pub struct FileRoleStore {
    root: PathBuf,
    next_seq: AtomicU64,
}

impl FileRoleStore {
    /// Open (creating if needed) a store rooted at `root`.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let store = Self {
            root: root.into(),
            next_seq: AtomicU64::new(0),
        };
        fs::create_dir_all(store.roles_dir()).await?;
        let next = store
            .load_all()
            .await?
            .iter()
            .map(|row| row.seq + 1)
            .max()
            .unwrap_or(0);
        store.next_seq.store(next, Ordering::SeqCst);
        debug!(root = %store.root.display(), next_seq = next, "opened role store");
        Ok(store)
    }

    /// Open the store under `config.data_dir`.
    pub async fn from_config(config: &AnalyzerConfig) -> Result<Self> {
        Self::open(config.data_dir.clone()).await
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn roles_dir(&self) -> PathBuf {
        self.root.join(ROLES_DIR)
    }

    fn role_path(&self, id: RoleId) -> PathBuf {
        self.roles_dir().join(format!("{id}.json"))
    }

    async fn read_row(&self, path: &Path) -> Result<Option<StoredRole>> {
        match fs::read(path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_row(&self, path: &Path, row: &StoredRole) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(row)?;
        let tmp_path = path.with_extension("tmp");
        let result = async {
            let mut f = fs::File::create(&tmp_path).await?;
            f.write_all(&bytes).await?;
            f.flush().await?;
            f.sync_all().await?;
            fs::rename(&tmp_path, path).await
        }
        .await;
        if let Err(e) = result {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(CoreError::Storage(format!(
                "failed to write {}: {e}",
                path.display()
            )));
        }
        Ok(())
    }

    async fn load_all(&self) -> Result<Vec<StoredRole>> {
        let mut rows = Vec::new();
        let mut entries = fs::read_dir(self.roles_dir()).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match self.read_row(&path).await? {
                Some(row) => rows.push(row),
                None => warn!(path = %path.display(), "role file vanished during scan"),
            }
        }
        rows.sort_by(|a, b| {
            a.seq
                .cmp(&b.seq)
                .then_with(|| a.created_at.cmp(&b.created_at))
                .then_with(|| a.job_role.job_role_id.cmp(&b.job_role.job_role_id))
        });
        Ok(rows)
    }
}

#[async_trait]
impl RoleStore for FileRoleStore {
    async fn iter_all_embeddings(&self) -> Result<Vec<(JobRoleSummary, Embedding)>> {
        let rows = self.load_all().await?;
        debug!(count = rows.len(), root = %self.root.display(), "loaded role embeddings");
        Ok(rows.into_iter().map(|r| (r.job_role, r.embedding)).collect())
    }

    async fn fetch_by_id(&self, id: RoleId) -> Result<Option<JobRoleWithCompetencies>> {
        Ok(self
            .read_row(&self.role_path(id))
            .await?
            .map(|row| row.to_record()))
    }

    async fn upsert(&self, record: &JobRoleWithCompetencies, embedding: &[f32]) -> Result<()> {
        let path = self.role_path(record.id());
        let row = match self.read_row(&path).await? {
            Some(mut existing) => {
                existing.replace(record, embedding);
                existing
            }
            None => {
                let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
                StoredRole::new(record, embedding, seq)
            }
        };
        self.write_row(&path, &row).await?;
        debug!(role_id = %record.id(), "persisted role");
        Ok(())
    }

    async fn delete(&self, id: RoleId) -> Result<bool> {
        match fs::remove_file(self.role_path(id)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.load_all().await?.len())
    }
}
