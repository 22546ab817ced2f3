//! # Application Dependencies
//!
//! Dependency grouping for [`PhotoGallery`](crate::PhotoGallery)
//! construction.
//!
//! **Note**: This is NOT a Builder pattern.
//! - No build steps
//! - No default values
//! - No hidden logic
//! - Just parameter grouping

use std::sync::Arc;
use gallery_core::ports::*;

/// Application dependency grouping (non-Builder, just parameter grouping)
///
/// All dependencies are required - no defaults, no optional fields.
pub struct AppDeps {
    // Session dependencies
    pub identity_provider: Arc<dyn IdentityProviderPort>,

    // Storage dependencies
    pub object_storage: Arc<dyn ObjectStoragePort>,
    pub document_store: Arc<dyn DocumentStorePort>,

    // System dependencies
    pub clock: Arc<dyn ClockPort>,
}
