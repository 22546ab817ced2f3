use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::errors::StorageError;
use crate::ids::UserId;
use crate::photo::{MimeType, StoragePath};

/// Metadata attached to a stored object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMetadata {
    #[serde(rename = "contentType")]
    pub content_type: MimeType,
    #[serde(rename = "userId")]
    pub owner_id: UserId,
    #[serde(rename = "originalName")]
    pub original_name: String,
}

/// Handle to a written object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRef {
    pub path: StoragePath,
    pub size: u64,
}

#[async_trait]
pub trait ObjectStoragePort: Send + Sync {
    /// Write `bytes` under `path`, replacing nothing: paths are unique per upload.
    async fn put(
        &self,
        path: &StoragePath,
        bytes: Bytes,
        metadata: ObjectMetadata,
    ) -> Result<ObjectRef, StorageError>;

    /// Long-lived public URL of a written object.
    async fn durable_url(&self, object: &ObjectRef) -> Result<String, StorageError>;
}

#[async_trait]
impl<T: ObjectStoragePort + ?Sized> ObjectStoragePort for Arc<T> {
    async fn put(
        &self,
        path: &StoragePath,
        bytes: Bytes,
        metadata: ObjectMetadata,
    ) -> Result<ObjectRef, StorageError> {
        (**self).put(path, bytes, metadata).await
    }

    async fn durable_url(&self, object: &ObjectRef) -> Result<String, StorageError> {
        (**self).durable_url(object).await
    }
}
