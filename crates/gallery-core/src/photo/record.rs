//! Photo metadata records as committed to, and read back from, the
//! document store.

use serde::{Deserialize, Serialize};

use super::{MimeType, StoragePath, TimestampMs};
use crate::ids::{PhotoId, UserId};

/// A committed metadata entry describing one uploaded image.
///
/// ## Invariants
/// - Created exactly once, after the object-storage write succeeded.
/// - Never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoRecord {
    pub id: PhotoId,
    pub owner_id: UserId,
    pub download_url: String,
    pub title: String,
    pub byte_size: u64,
    pub mime_type: MimeType,
    pub storage_path: StoragePath,
    pub created_at: TimestampMs,
}

/// Fields written by the upload coordinator.
///
/// Field names follow the backing collection's schema; `createdAt` is
/// absent because the store assigns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPhotoDocument {
    #[serde(rename = "userId")]
    pub owner_id: UserId,
    #[serde(rename = "url")]
    pub download_url: String,
    pub title: String,
    #[serde(rename = "size")]
    pub byte_size: u64,
    #[serde(rename = "type")]
    pub mime_type: MimeType,
    #[serde(rename = "fileName")]
    pub file_name: String,
    #[serde(rename = "path")]
    pub storage_path: StoragePath,
}

/// A document as delivered by a live query.
///
/// `created_at` is `None` while the server timestamp of a local write is
/// still pending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoDocument {
    pub id: PhotoId,
    #[serde(flatten)]
    pub fields: NewPhotoDocument,
    #[serde(rename = "createdAt")]
    pub created_at: Option<TimestampMs>,
}

impl PhotoDocument {
    pub fn is_pending(&self) -> bool {
        self.created_at.is_none()
    }

    /// Materialize into a record, using `fallback` for a pending timestamp.
    pub fn into_record(self, fallback: TimestampMs) -> PhotoRecord {
        let NewPhotoDocument {
            owner_id,
            download_url,
            title,
            byte_size,
            mime_type,
            file_name: _,
            storage_path,
        } = self.fields;

        PhotoRecord {
            id: self.id,
            owner_id,
            download_url,
            title,
            byte_size,
            mime_type,
            storage_path,
            created_at: self.created_at.unwrap_or(fallback),
        }
    }
}

impl PhotoRecord {
    pub fn from_committed(id: PhotoId, fields: NewPhotoDocument, created_at: TimestampMs) -> Self {
        PhotoDocument {
            id,
            fields,
            created_at: Some(created_at),
        }
        .into_record(created_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::UploadId;
    use serde_json::json;

    fn fields() -> NewPhotoDocument {
        let owner = UserId::from("uid-1");
        let path = StoragePath::derive(&owner, &UploadId::from("u1"), "cat.png");
        NewPhotoDocument {
            owner_id: owner,
            download_url: "https://cdn.example/photos/uid-1/u1-cat.png".into(),
            title: "cat.png".into(),
            byte_size: 2048,
            mime_type: MimeType::image_png(),
            file_name: path.file_name().to_string(),
            storage_path: path,
        }
    }

    #[test]
    fn test_new_document_uses_backing_schema_names() {
        let value = serde_json::to_value(fields()).unwrap();
        assert_eq!(
            value,
            json!({
                "userId": "uid-1",
                "url": "https://cdn.example/photos/uid-1/u1-cat.png",
                "title": "cat.png",
                "size": 2048,
                "type": "image/png",
                "fileName": "u1-cat.png",
                "path": "photos/uid-1/u1-cat.png",
            })
        );
    }

    #[test]
    fn test_pending_document_takes_fallback_time() {
        let doc = PhotoDocument {
            id: PhotoId::from("doc-1"),
            fields: fields(),
            created_at: None,
        };
        assert!(doc.is_pending());

        let record = doc.into_record(TimestampMs::from_epoch_millis(99));
        assert_eq!(record.created_at.as_millis(), 99);
        assert_eq!(record.title, "cat.png");
    }

    #[test]
    fn test_committed_document_keeps_server_time() {
        let doc = PhotoDocument {
            id: PhotoId::from("doc-1"),
            fields: fields(),
            created_at: Some(TimestampMs::from_epoch_millis(5)),
        };
        let record = doc.into_record(TimestampMs::from_epoch_millis(99));
        assert_eq!(record.created_at.as_millis(), 5);
    }
}
