//! Port interfaces for the application layer
//!
//! Ports define the contract between the gallery use cases and the hosted
//! backend adapters: identity provider, object storage, realtime document
//! store and the clock.

mod clock;
pub mod document_store;
pub mod errors;
pub mod identity_provider;
pub mod object_storage;

#[cfg(any(test, feature = "testing"))]
pub mod mocks;

pub use clock::ClockPort;
pub use document_store::{
    DocumentStorePort, InsertedDocument, LiveQuery, PhotoQuery, QuerySnapshot, SnapshotResult,
};
pub use errors::{DocumentStoreError, ProviderError, StorageError};
pub use identity_provider::IdentityProviderPort;
pub use object_storage::{ObjectMetadata, ObjectRef, ObjectStoragePort};
