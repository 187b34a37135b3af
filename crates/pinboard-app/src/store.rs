use std::path::Path;
use std::sync::Arc;

use pinboard_core::{PinboardResult, Store};
use pinboard_persistence::{JsonFileStore, MemoryStore};

/// Open the backing store: a JSON data file when `data_file` is given,
/// otherwise an in-memory store that forgets everything on exit.
pub async fn open_store(
    data_file: Option<&Path>,
    quota_bytes: Option<u64>,
) -> PinboardResult<Arc<dyn Store>> {
    let store: Arc<dyn Store> = match (data_file, quota_bytes) {
        (Some(path), Some(quota)) => Arc::new(JsonFileStore::with_quota(path, quota).await?),
        (Some(path), None) => Arc::new(JsonFileStore::open(path).await?),
        (None, Some(quota)) => Arc::new(MemoryStore::with_quota(quota)),
        (None, None) => Arc::new(MemoryStore::new()),
    };
    Ok(store)
}
