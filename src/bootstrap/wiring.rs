//! # Dependency Injection
//!
//! - Create the backend adapters selected by the configuration
//! - Group them into [`AppDeps`]
//!
//! No business logic and no configuration validation: this module only
//! assembles.

use std::path::Path;
use std::sync::Arc;

use gallery_app::AppDeps;
use gallery_core::config::AppConfig;
use gallery_core::ports::*;
use gallery_infra::{
    FsObjectStore, InMemoryDocumentStore, InMemoryIdentityProvider, InMemoryObjectStorage,
    SystemClock,
};
use tracing::info;

/// Result type for wiring operations
pub type WiringResult<T> = Result<T, WiringError>;

/// Errors during dependency injection
#[derive(Debug, thiserror::Error)]
pub enum WiringError {
    #[error("Object storage initialization failed: {0}")]
    ObjectStorageInit(String),
}

/// Filesystem storage when a root directory is configured, in-memory
/// storage otherwise.
fn create_object_storage(config: &AppConfig) -> WiringResult<Arc<dyn ObjectStoragePort>> {
    if config.storage_root.as_os_str().is_empty() {
        info!("No storage root configured; objects are kept in memory");
        let storage = if config.public_base_url.is_empty() {
            InMemoryObjectStorage::new()
        } else {
            InMemoryObjectStorage::with_base_url(config.public_base_url.clone())
        };
        return Ok(Arc::new(storage));
    }

    ensure_dir(&config.storage_root)?;
    info!(root = %config.storage_root.display(), "Using filesystem object storage");
    Ok(Arc::new(FsObjectStore::new(
        config.storage_root.clone(),
        config.public_base_url.clone(),
    )))
}

fn ensure_dir(dir: &Path) -> WiringResult<()> {
    std::fs::create_dir_all(dir).map_err(|e| {
        WiringError::ObjectStorageInit(format!(
            "Failed to create storage root {}: {}",
            dir.display(),
            e
        ))
    })
}

/// Wire all gallery dependencies from the configuration.
pub fn wire_dependencies(config: &AppConfig) -> WiringResult<AppDeps> {
    let clock: Arc<dyn ClockPort> = Arc::new(SystemClock);

    Ok(AppDeps {
        identity_provider: Arc::new(InMemoryIdentityProvider::new()),
        object_storage: create_object_storage(config)?,
        document_store: Arc::new(InMemoryDocumentStore::new(clock.clone())),
        clock,
    })
}
