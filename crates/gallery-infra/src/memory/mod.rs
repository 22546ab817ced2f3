//! In-memory stand-ins for the hosted backend.

pub mod document_store;
pub mod identity_provider;
pub mod object_storage;

pub use document_store::InMemoryDocumentStore;
pub use identity_provider::{InMemoryIdentityProvider, ProviderOp};
pub use object_storage::InMemoryObjectStorage;
