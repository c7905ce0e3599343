use articast_core::{ArticastError, ArticastResult, GeneratedArtifact};
use articast_pipeline::ArtifactStore;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// An artifact as persisted on disk, with its owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredArtifact {
    /// The principal the artifact was generated for.
    pub owner_id: String,
    /// The artifact itself.
    pub artifact: GeneratedArtifact,
}

/// File-based artifact store (JSON files on disk). Good enough for a
/// single-process deployment.
pub struct FileArtifactStore {
    dir: PathBuf,
}

impl FileArtifactStore {
    /// Creates the store, creating the directory if needed.
    pub async fn new(dir: PathBuf) -> ArticastResult<Self> {
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    fn artifact_path(&self, id: Uuid) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    /// Loads a stored artifact by id.
    pub async fn get(&self, id: Uuid) -> ArticastResult<Option<StoredArtifact>> {
        let path = self.artifact_path(id);
        if !path.exists() {
            return Ok(None);
        }
        let data = tokio::fs::read_to_string(path).await?;
        let stored: StoredArtifact = serde_json::from_str(&data)
            .map_err(|e| ArticastError::Storage(format!("failed to parse artifact: {e}")))?;
        Ok(Some(stored))
    }
}

#[async_trait]
impl ArtifactStore for FileArtifactStore {
    async fn save(&self, owner_id: &str, artifact: &GeneratedArtifact) -> ArticastResult<Uuid> {
        let stored = StoredArtifact {
            owner_id: owner_id.to_string(),
            artifact: artifact.clone(),
        };
        let json = serde_json::to_string_pretty(&stored)?;
        tokio::fs::write(self.artifact_path(artifact.id), json)
            .await
            .map_err(|e| ArticastError::Storage(format!("write failed: {e}")))?;
        Ok(artifact.id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_then_get_roundtrip() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileArtifactStore::new(tmp.path().join("artifacts"))
            .await
            .unwrap();

        let artifact = GeneratedArtifact::new(
            "Title",
            "Body text",
            "Summary",
            vec!["a point".to_string()],
            vec![],
        );
        let id = store.save("owner-1", &artifact).await.unwrap();
        assert_eq!(id, artifact.id);

        let stored = store.get(id).await.unwrap().unwrap();
        assert_eq!(stored.owner_id, "owner-1");
        assert_eq!(stored.artifact.title, "Title");
    }

    #[tokio::test]
    async fn get_unknown_id_is_none() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileArtifactStore::new(tmp.path().to_path_buf()).await.unwrap();
        assert!(store.get(Uuid::new_v4()).await.unwrap().is_none());
    }
}
