//! Photo domain models.
mod candidate;
mod collection;
mod mime;
mod record;
mod storage_path;
mod timestamp;

pub use candidate::{UploadCandidate, MAX_UPLOAD_BYTES};
pub use collection::{CollectionView, PendingReceipts};
pub use mime::MimeType;
pub use record::{NewPhotoDocument, PhotoDocument, PhotoRecord};
pub use storage_path::{sanitize_file_name, StoragePath, PHOTOS_PREFIX};
pub use timestamp::TimestampMs;
