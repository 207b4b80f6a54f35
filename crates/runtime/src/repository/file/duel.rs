//! File-based DuelStore implementation.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use duel_core::{Duel, DuelId};
use tokio::fs;

use crate::repository::{DuelStore, RepositoryError, Result};

/// Stores each duel as its own JSON document.
///
/// # File Format
///
/// Duels are stored as `duel_{id}.json`. Writes go to a temp file first and
/// are moved into place with a rename, so a reader never observes a half
/// written document.
pub struct FileDuelStore {
    base_dir: PathBuf,
}

impl FileDuelStore {
    /// Open (and create if needed) a store rooted at `base_dir`.
    pub async fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir).await?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn duel_path(&self, id: DuelId) -> PathBuf {
        self.base_dir.join(format!("duel_{}.json", id))
    }

    async fn write(&self, duel: &Duel) -> Result<()> {
        let path = self.duel_path(duel.id());
        let temp_path = path.with_extension("json.tmp");

        let bytes = serde_json::to_vec_pretty(duel)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        fs::write(&temp_path, bytes).await?;
        fs::rename(&temp_path, &path).await?;

        tracing::debug!(target: "duel::store", duel_id = %duel.id(), path = %path.display(), "saved duel");
        Ok(())
    }
}

#[async_trait]
impl DuelStore for FileDuelStore {
    async fn find_by_id(&self, id: DuelId) -> Result<Option<Duel>> {
        let path = self.duel_path(id);

        if !fs::try_exists(&path).await? {
            return Ok(None);
        }

        let bytes = fs::read(&path).await?;
        let duel: Duel = serde_json::from_slice(&bytes)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        Ok(Some(duel))
    }

    async fn create(&self, duel: &Duel) -> Result<()> {
        if fs::try_exists(self.duel_path(duel.id())).await? {
            return Err(RepositoryError::AlreadyExists(duel.id()));
        }
        self.write(duel).await
    }

    async fn save(&self, duel: &Duel) -> Result<()> {
        self.write(duel).await
    }
}
