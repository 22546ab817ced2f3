use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use gallery_core::ports::{ObjectMetadata, ObjectRef, ObjectStoragePort, StorageError};
use gallery_core::photo::{StoragePath, PHOTOS_PREFIX};
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::debug;

const META_SUFFIX: &str = ".meta.json";

/// Object storage on the local filesystem.
///
/// An object at `photos/<owner>/<name>` is written to
/// `<root>/photos/<owner>/<name>`, with its metadata next to it in
/// `<name>.meta.json`. Durable URLs are `<public_base_url>/<path>`.
pub struct FsObjectStore {
    root: PathBuf,
    public_base_url: String,
}

impl FsObjectStore {
    pub fn new(root: PathBuf, public_base_url: impl Into<String>) -> Self {
        Self {
            root,
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve an object key below the root, refusing anything that could
    /// escape it.
    fn resolve(&self, path: &StoragePath) -> Result<PathBuf> {
        let relative = Path::new(path.as_str());
        if !relative.starts_with(PHOTOS_PREFIX) {
            bail!("object key outside of {PHOTOS_PREFIX}/: {path}");
        }
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            bail!("object key is not a plain relative path: {path}");
        }
        Ok(self.root.join(relative))
    }

    async fn write_object(
        &self,
        path: &StoragePath,
        bytes: &[u8],
        metadata: &ObjectMetadata,
    ) -> Result<()> {
        let data_path = self.resolve(path)?;
        if let Some(dir) = data_path.parent() {
            fs::create_dir_all(dir)
                .await
                .with_context(|| format!("Failed to create directory {}", dir.display()))?;
        }

        let meta_path = meta_path_for(&data_path);
        let meta = serde_json::to_vec(metadata).context("Failed to encode object metadata")?;
        fs::write(&meta_path, meta)
            .await
            .with_context(|| format!("Failed to write {}", meta_path.display()))?;

        fs::write(&data_path, bytes)
            .await
            .with_context(|| format!("Failed to write {}", data_path.display()))?;

        Ok(())
    }

    /// Read back an object's bytes and metadata.
    pub async fn read(&self, path: &StoragePath) -> Result<(Vec<u8>, ObjectMetadata)> {
        let data_path = self.resolve(path)?;
        let bytes = fs::read(&data_path)
            .await
            .with_context(|| format!("Failed to read {}", data_path.display()))?;
        let meta_bytes = fs::read(meta_path_for(&data_path))
            .await
            .with_context(|| format!("Failed to read metadata of {path}"))?;
        let metadata = serde_json::from_slice(&meta_bytes)
            .with_context(|| format!("Failed to decode metadata of {path}"))?;
        Ok((bytes, metadata))
    }
}

fn meta_path_for(data_path: &Path) -> PathBuf {
    let mut name = data_path.as_os_str().to_os_string();
    name.push(META_SUFFIX);
    PathBuf::from(name)
}

#[async_trait]
impl ObjectStoragePort for FsObjectStore {
    async fn put(
        &self,
        path: &StoragePath,
        bytes: Bytes,
        metadata: ObjectMetadata,
    ) -> Result<ObjectRef, StorageError> {
        self.write_object(path, &bytes, &metadata)
            .await
            .map_err(|err| StorageError::Io(format!("{err:#}")))?;

        debug!(path = %path, size = bytes.len(), "Object written");
        Ok(ObjectRef {
            path: path.clone(),
            size: bytes.len() as u64,
        })
    }

    async fn durable_url(&self, object: &ObjectRef) -> Result<String, StorageError> {
        let data_path = self
            .resolve(&object.path)
            .map_err(|err| StorageError::Rejected(err.to_string()))?;
        match fs::try_exists(&data_path).await {
            Ok(true) => Ok(format!("{}/{}", self.public_base_url, object.path)),
            Ok(false) => Err(StorageError::NotFound(object.path.to_string())),
            Err(err) => Err(StorageError::Io(err.to_string())),
        }
    }
}
