use crate::store::{AtomicWriter, MemoryStore};
use crate::traits::{PersistenceMetadata, FORMAT_VERSION};
use async_trait::async_trait;
use pinboard_core::{Collection, PinboardError, PinboardResult, Row, Store};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use uuid::Uuid;

/// On-disk layout of the data file.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonEnvelope {
    pub version: u32,
    pub metadata: PersistenceMetadata,
    pub data: serde_json::Value,
}

/// Store backed by a single JSON file.
///
/// Rows live in a [`MemoryStore`]; every `put` and `delete` rewrites the
/// whole file atomically. A write that cannot be saved is rolled back in
/// memory so the file and the in-memory rows never disagree.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    instance_id: Uuid,
    rows: MemoryStore,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open `path`, loading its rows when the file exists.
    pub async fn open(path: impl AsRef<Path>) -> PinboardResult<Self> {
        Self::open_with(path, MemoryStore::new()).await
    }

    /// Like [`JsonFileStore::open`], refusing writes past `quota_bytes` of
    /// row data.
    pub async fn with_quota(path: impl AsRef<Path>, quota_bytes: u64) -> PinboardResult<Self> {
        Self::open_with(path, MemoryStore::with_quota(quota_bytes)).await
    }

    async fn open_with(path: impl AsRef<Path>, rows: MemoryStore) -> PinboardResult<Self> {
        let store = Self {
            path: path.as_ref().to_path_buf(),
            instance_id: Uuid::new_v4(),
            rows,
            write_lock: Mutex::new(()),
        };
        if store.path.exists() {
            let envelope = Self::read_envelope(&store.path).await?;
            store.rows.load(&envelope.data).await?;
            tracing::info!(
                path = %store.path.display(),
                saved_at = %envelope.metadata.saved_at,
                "loaded data file"
            );
        } else {
            tracing::debug!(path = %store.path.display(), "data file does not exist yet");
        }
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn instance_id(&self) -> Uuid {
        self.instance_id
    }

    async fn read_envelope(path: &Path) -> PinboardResult<JsonEnvelope> {
        let bytes = AtomicWriter::read_all(path).await?;
        let envelope: JsonEnvelope = serde_json::from_slice(&bytes)?;
        if envelope.version != FORMAT_VERSION {
            return Err(PinboardError::Serialization(format!(
                "Unsupported format version: {}",
                envelope.version
            )));
        }
        Ok(envelope)
    }

    async fn save(&self) -> PinboardResult<()> {
        let envelope = JsonEnvelope {
            version: FORMAT_VERSION,
            metadata: PersistenceMetadata::new(self.instance_id),
            data: self.rows.dump().await,
        };
        let bytes = serde_json::to_vec_pretty(&envelope)?;
        AtomicWriter::write_atomic(&self.path, &bytes).await
    }

    /// Put `previous` back after a failed save.
    async fn restore(&self, collection: Collection, key: &str, previous: Option<Row>) {
        let restored = match previous {
            Some(row) => self.rows.put(collection, row).await,
            None => self.rows.delete(collection, key).await,
        };
        if let Err(e) = restored {
            tracing::error!(%collection, %key, error = %e, "failed to roll back unsaved write");
        }
    }
}

#[async_trait]
impl Store for JsonFileStore {
    async fn get(&self, collection: Collection, key: &str) -> PinboardResult<Option<Row>> {
        self.rows.get(collection, key).await
    }

    async fn get_all(&self, collection: Collection) -> PinboardResult<Vec<Row>> {
        self.rows.get_all(collection).await
    }

    async fn get_all_by_index(
        &self,
        collection: Collection,
        field: &str,
        value: &str,
    ) -> PinboardResult<Vec<Row>> {
        self.rows.get_all_by_index(collection, field, value).await
    }

    async fn put(&self, collection: Collection, row: Row) -> PinboardResult<()> {
        let _guard = self.write_lock.lock().await;
        let key = collection.key_of(&row).unwrap_or_default();
        let previous = self.rows.get(collection, &key).await?;
        self.rows.put(collection, row).await?;
        if let Err(e) = self.save().await {
            tracing::error!(%collection, %key, error = %e, "failed to save data file");
            self.restore(collection, &key, previous).await;
            return Err(e);
        }
        Ok(())
    }

    async fn delete(&self, collection: Collection, key: &str) -> PinboardResult<()> {
        let _guard = self.write_lock.lock().await;
        let Some(previous) = self.rows.get(collection, key).await? else {
            return Ok(());
        };
        self.rows.delete(collection, key).await?;
        if let Err(e) = self.save().await {
            tracing::error!(%collection, %key, error = %e, "failed to save data file");
            self.restore(collection, key, Some(previous)).await;
            return Err(e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_rows_survive_reopen() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("pinboard.json");

        let store = JsonFileStore::open(&file_path).await.unwrap();
        assert!(!file_path.exists());
        store
            .put(Collection::Boards, json!({"id": "b1", "name": "Trip"}))
            .await
            .unwrap();
        store
            .put(Collection::Tabs, json!({"id": "t1", "board_id": "b1"}))
            .await
            .unwrap();
        store.delete(Collection::Tabs, "t1").await.unwrap();
        assert!(file_path.exists());

        let reopened = JsonFileStore::open(&file_path).await.unwrap();
        assert_ne!(reopened.instance_id(), store.instance_id());
        let board = reopened.get(Collection::Boards, "b1").await.unwrap().unwrap();
        assert_eq!(board["name"], "Trip");
        assert!(reopened.get_all(Collection::Tabs).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_envelope_format() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("pinboard.json");
        let store = JsonFileStore::open(&file_path).await.unwrap();
        store.put(Collection::Cards, json!({"id": "c1", "board_id": "b1"})).await.unwrap();

        let raw: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&file_path).unwrap()).unwrap();
        assert_eq!(raw["version"], FORMAT_VERSION);
        assert_eq!(raw["metadata"]["instance_id"], store.instance_id().to_string());
        assert_eq!(raw["data"]["cards"][0]["id"], "c1");
    }

    #[tokio::test]
    async fn test_unsupported_version_rejected() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("pinboard.json");
        let envelope = json!({
            "version": 99,
            "metadata": {
                "format_version": 99,
                "instance_id": Uuid::new_v4(),
                "saved_at": chrono::Utc::now()
            },
            "data": {}
        });
        std::fs::write(&file_path, serde_json::to_vec(&envelope).unwrap()).unwrap();

        let result = JsonFileStore::open(&file_path).await;
        assert!(matches!(result, Err(PinboardError::Serialization(_))));
    }

    #[tokio::test]
    async fn test_quota_refusal_leaves_file_untouched() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("pinboard.json");
        let store = JsonFileStore::with_quota(&file_path, 64).await.unwrap();
        store.put(Collection::Boards, json!({"id": "b1", "name": "A"})).await.unwrap();
        let before = std::fs::read(&file_path).unwrap();

        let result = store
            .put(Collection::Boards, json!({"id": "b2", "name": "x".repeat(200)}))
            .await;
        assert!(matches!(result, Err(PinboardError::StorageFull(_))));
        assert_eq!(std::fs::read(&file_path).unwrap(), before);
    }
}
