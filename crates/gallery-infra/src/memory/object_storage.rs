use async_trait::async_trait;
use bytes::Bytes;
use gallery_core::ports::{ObjectMetadata, ObjectRef, ObjectStoragePort, StorageError};
use gallery_core::StoragePath;
use std::collections::HashMap;
use tokio::sync::Mutex;

const DEFAULT_BASE_URL: &str = "memory://objects";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bytes: Bytes,
    pub metadata: ObjectMetadata,
}

#[derive(Default)]
struct State {
    objects: HashMap<StoragePath, StoredObject>,
    put_fault: Option<StorageError>,
    url_fault: Option<StorageError>,
}

/// Object storage held in memory.
pub struct InMemoryObjectStorage {
    state: Mutex<State>,
    base_url: String,
}

impl Default for InMemoryObjectStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryObjectStorage {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            state: Mutex::new(State::default()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn fail_next_put(&self, err: StorageError) {
        self.state.lock().await.put_fault = Some(err);
    }

    pub async fn fail_next_url(&self, err: StorageError) {
        self.state.lock().await.url_fault = Some(err);
    }

    pub async fn object(&self, path: &StoragePath) -> Option<StoredObject> {
        self.state.lock().await.objects.get(path).cloned()
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.objects.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl ObjectStoragePort for InMemoryObjectStorage {
    async fn put(
        &self,
        path: &StoragePath,
        bytes: Bytes,
        metadata: ObjectMetadata,
    ) -> Result<ObjectRef, StorageError> {
        let mut state = self.state.lock().await;
        if let Some(err) = state.put_fault.take() {
            return Err(err);
        }

        let size = bytes.len() as u64;
        state
            .objects
            .insert(path.clone(), StoredObject { bytes, metadata });
        Ok(ObjectRef {
            path: path.clone(),
            size,
        })
    }

    async fn durable_url(&self, object: &ObjectRef) -> Result<String, StorageError> {
        let mut state = self.state.lock().await;
        if let Some(err) = state.url_fault.take() {
            return Err(err);
        }
        if !state.objects.contains_key(&object.path) {
            return Err(StorageError::NotFound(object.path.to_string()));
        }
        Ok(format!("{}/{}", self.base_url, object.path))
    }
}
