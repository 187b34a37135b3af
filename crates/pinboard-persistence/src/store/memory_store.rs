use std::collections::BTreeMap;

use async_trait::async_trait;
use pinboard_core::{Collection, PinboardError, PinboardResult, Row, Store};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Tables {
    rows: BTreeMap<Collection, BTreeMap<String, Row>>,
    /// Serialized size of every row, for quota accounting.
    sizes: BTreeMap<(Collection, String), u64>,
    used_bytes: u64,
}

/// Store kept entirely in memory.
///
/// With a quota, a `put` that would push the total serialized row size past
/// it fails with [`PinboardError::StorageFull`] and changes nothing.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    quota_bytes: Option<u64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota_bytes: u64) -> Self {
        Self {
            tables: RwLock::default(),
            quota_bytes: Some(quota_bytes),
        }
    }

    pub fn quota_bytes(&self) -> Option<u64> {
        self.quota_bytes
    }

    pub async fn used_bytes(&self) -> u64 {
        self.tables.read().await.used_bytes
    }

    /// Every row, keyed by collection name.
    pub async fn dump(&self) -> serde_json::Value {
        let tables = self.tables.read().await;
        let mut out = serde_json::Map::new();
        for collection in Collection::ALL {
            let rows = tables
                .rows
                .get(&collection)
                .map(|rows| rows.values().cloned().collect())
                .unwrap_or_default();
            out.insert(collection.name().to_string(), serde_json::Value::Array(rows));
        }
        serde_json::Value::Object(out)
    }

    /// Replace the contents with a [`MemoryStore::dump`] value. Unknown
    /// collections are ignored; rows without a key are skipped. The quota is
    /// not enforced while loading.
    pub async fn load(&self, data: &serde_json::Value) -> PinboardResult<()> {
        let object = data.as_object().ok_or_else(|| {
            PinboardError::Serialization("store data must be a JSON object".to_string())
        })?;
        let mut tables = Tables::default();
        for collection in Collection::ALL {
            let Some(rows) = object.get(collection.name()) else {
                continue;
            };
            let rows = rows.as_array().ok_or_else(|| {
                PinboardError::Serialization(format!("collection '{}' must be an array", collection))
            })?;
            for row in rows {
                match collection.key_of(row) {
                    Some(key) => tables.insert(collection, key, row.clone())?,
                    None => tracing::warn!(%collection, "skipping stored row without a key"),
                }
            }
        }
        *self.tables.write().await = tables;
        Ok(())
    }
}

impl Tables {
    fn insert(&mut self, collection: Collection, key: String, row: Row) -> PinboardResult<()> {
        let size = serde_json::to_vec(&row)?.len() as u64;
        let previous = self
            .sizes
            .insert((collection, key.clone()), size)
            .unwrap_or_default();
        self.used_bytes = self.used_bytes - previous + size;
        self.rows.entry(collection).or_default().insert(key, row);
        Ok(())
    }

    fn remove(&mut self, collection: Collection, key: &str) {
        if let Some(size) = self.sizes.remove(&(collection, key.to_string())) {
            self.used_bytes -= size;
        }
        if let Some(rows) = self.rows.get_mut(&collection) {
            rows.remove(key);
        }
    }

    fn size_of(&self, collection: Collection, key: &str) -> u64 {
        self.sizes
            .get(&(collection, key.to_string()))
            .copied()
            .unwrap_or_default()
    }
}

fn field_matches(row: &Row, field: &str, value: &str) -> bool {
    match row.get(field) {
        Some(serde_json::Value::String(s)) => s == value,
        Some(serde_json::Value::Null) | None => false,
        Some(other) => other.to_string() == value,
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get(&self, collection: Collection, key: &str) -> PinboardResult<Option<Row>> {
        let tables = self.tables.read().await;
        Ok(tables
            .rows
            .get(&collection)
            .and_then(|rows| rows.get(key))
            .cloned())
    }

    async fn get_all(&self, collection: Collection) -> PinboardResult<Vec<Row>> {
        let tables = self.tables.read().await;
        Ok(tables
            .rows
            .get(&collection)
            .map(|rows| rows.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn get_all_by_index(
        &self,
        collection: Collection,
        field: &str,
        value: &str,
    ) -> PinboardResult<Vec<Row>> {
        let tables = self.tables.read().await;
        Ok(tables
            .rows
            .get(&collection)
            .map(|rows| {
                rows.values()
                    .filter(|row| field_matches(row, field, value))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn put(&self, collection: Collection, row: Row) -> PinboardResult<()> {
        let key = collection.key_of(&row).ok_or_else(|| {
            PinboardError::Validation(format!(
                "{} row has no '{}' field",
                collection,
                collection.key_field()
            ))
        })?;
        let mut tables = self.tables.write().await;
        if let Some(quota) = self.quota_bytes {
            let size = serde_json::to_vec(&row)?.len() as u64;
            let projected = tables.used_bytes - tables.size_of(collection, &key) + size;
            if projected > quota {
                tracing::warn!(%collection, %key, projected, quota, "store quota exceeded");
                return Err(PinboardError::StorageFull(format!(
                    "writing {} '{}' needs {} bytes, quota is {}",
                    collection, key, projected, quota
                )));
            }
        }
        tables.insert(collection, key, row)
    }

    async fn delete(&self, collection: Collection, key: &str) -> PinboardResult<()> {
        self.tables.write().await.remove(collection, key);
        Ok(())
    }
}
