//! `mockall` doubles of the gallery ports.
//!
//! Available to downstream crates through the `testing` feature.

use async_trait::async_trait;
use bytes::Bytes;
use mockall::mock;
use tokio::sync::watch;

use super::{
    ClockPort, DocumentStoreError, DocumentStorePort, IdentityProviderPort, InsertedDocument,
    LiveQuery, ObjectMetadata, ObjectRef, ObjectStoragePort, PhotoQuery, ProviderError,
    StorageError,
};
use crate::photo::{NewPhotoDocument, StoragePath};
use crate::session::ProviderUser;

mock! {
    pub IdentityProvider {}

    #[async_trait]
    impl IdentityProviderPort for IdentityProvider {
        async fn create_account(&self, email: &str, password: &str)
            -> Result<ProviderUser, ProviderError>;
        async fn sign_in(&self, email: &str, password: &str)
            -> Result<ProviderUser, ProviderError>;
        async fn sign_out(&self) -> Result<(), ProviderError>;
        async fn update_display_name(&self, display_name: &str) -> Result<(), ProviderError>;
        fn watch_session(&self) -> watch::Receiver<Option<ProviderUser>>;
    }
}

mock! {
    pub ObjectStorage {}

    #[async_trait]
    impl ObjectStoragePort for ObjectStorage {
        async fn put(
            &self,
            path: &StoragePath,
            bytes: Bytes,
            metadata: ObjectMetadata,
        ) -> Result<ObjectRef, StorageError>;
        async fn durable_url(&self, object: &ObjectRef) -> Result<String, StorageError>;
    }
}

mock! {
    pub DocumentStore {}

    #[async_trait]
    impl DocumentStorePort for DocumentStore {
        async fn insert(&self, document: NewPhotoDocument)
            -> Result<InsertedDocument, DocumentStoreError>;
        async fn live_query(&self, query: PhotoQuery) -> Result<LiveQuery, DocumentStoreError>;
    }
}

mock! {
    pub Clock {}

    impl ClockPort for Clock {
        fn now_ms(&self) -> i64;
    }
}
