//! # gallery-core
//!
//! Core domain models and business rules for the photo gallery workflow.
//!
//! This crate contains pure domain logic without any infrastructure
//! dependencies: identities, photo records, the collection projection, the
//! error taxonomy, and the ports implemented by the hosted backend adapters.

pub mod config;
pub mod errors;
pub mod ids;
pub mod photo;
pub mod ports;
pub mod session;

// Re-export commonly used types at the crate root
pub use config::AppConfig;
pub use errors::{ErrorCode, GalleryError, SessionError, SubscriptionError, UploadError};
pub use ids::{PhotoId, UploadId, UserId};
pub use photo::{
    CollectionView, MimeType, PhotoRecord, StoragePath, TimestampMs, UploadCandidate,
    MAX_UPLOAD_BYTES,
};
pub use session::{Identity, ProviderUser, SignupOutcome};
