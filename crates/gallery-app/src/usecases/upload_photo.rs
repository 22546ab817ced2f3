//! Upload commit: validate, write the object, resolve its URL, commit the
//! metadata record.

use std::sync::Arc;

use gallery_core::photo::NewPhotoDocument;
use gallery_core::ports::{DocumentStorePort, ObjectMetadata, ObjectStoragePort};
use gallery_core::{PhotoRecord, StoragePath, UploadCandidate, UploadError, UploadId, UserId};
use tracing::{error, info, warn};

/// Use case for uploading one image on behalf of a signed-in user.
///
/// ## Behavior
/// - Validation runs before any network call, in this order: owner present,
///   content type is an image, size within the limit.
/// - Each attempt gets a fresh upload id, so the storage path is unique even
///   for concurrent uploads of the same file name.
/// - No retry. A failed metadata commit leaves an orphaned object behind,
///   which is logged and otherwise accepted.
pub struct UploadPhoto {
    object_storage: Arc<dyn ObjectStoragePort>,
    document_store: Arc<dyn DocumentStorePort>,
}

impl UploadPhoto {
    pub fn from_ports(
        object_storage: Arc<dyn ObjectStoragePort>,
        document_store: Arc<dyn DocumentStorePort>,
    ) -> Self {
        Self {
            object_storage,
            document_store,
        }
    }

    #[tracing::instrument(
        name = "usecase.upload_photo.execute",
        skip(self, candidate, owner),
        fields(
            file_name = %candidate.file_name,
            content_type = %candidate.content_type,
            size = candidate.byte_size(),
        )
    )]
    pub async fn execute(
        &self,
        candidate: UploadCandidate,
        owner: Option<&UserId>,
    ) -> Result<PhotoRecord, UploadError> {
        let owner = match owner {
            Some(owner) if !owner.is_blank() => owner.clone(),
            _ => return Err(UploadError::NotAuthenticated),
        };
        candidate.validate().map_err(|err| {
            info!(error = ?err, "Upload rejected by validation");
            err
        })?;

        let upload_id = UploadId::new();
        let storage_path = StoragePath::derive(&owner, &upload_id, &candidate.file_name);
        let byte_size = candidate.byte_size();

        let metadata = ObjectMetadata {
            content_type: candidate.content_type.clone(),
            owner_id: owner.clone(),
            original_name: candidate.file_name.clone(),
        };
        let object = self
            .object_storage
            .put(&storage_path, candidate.bytes, metadata)
            .await
            .map_err(|err| {
                error!(path = %storage_path, error = %err, "Object write failed");
                UploadError::UploadFailed {
                    reason: err.to_string(),
                }
            })?;

        let download_url = self
            .object_storage
            .durable_url(&object)
            .await
            .map_err(|err| {
                error!(path = %storage_path, error = %err, "Durable URL resolution failed");
                UploadError::UploadFailed {
                    reason: err.to_string(),
                }
            })?;

        let document = NewPhotoDocument {
            owner_id: owner,
            download_url,
            title: candidate.file_name,
            byte_size,
            mime_type: candidate.content_type,
            file_name: storage_path.file_name().to_string(),
            storage_path: storage_path.clone(),
        };
        let inserted = self
            .document_store
            .insert(document.clone())
            .await
            .map_err(|err| {
                warn!(
                    orphaned_path = %storage_path,
                    error = %err,
                    "Metadata commit failed; stored object is orphaned"
                );
                UploadError::MetadataCommitFailed {
                    reason: err.to_string(),
                    orphaned_path: storage_path.to_string(),
                }
            })?;

        let record = PhotoRecord::from_committed(inserted.id, document, inserted.created_at);
        info!(photo_id = %record.id, path = %record.storage_path, "Photo uploaded");
        Ok(record)
    }
}
