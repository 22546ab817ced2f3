//! A file offered for upload, before any network effect.

use bytes::Bytes;

use super::MimeType;
use crate::errors::UploadError;

/// Largest accepted upload: 10 MiB.
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadCandidate {
    /// File name as picked or dropped by the user; becomes the photo title.
    pub file_name: String,
    /// Declared content type.
    pub content_type: MimeType,
    pub bytes: Bytes,
}

impl UploadCandidate {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<MimeType>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    pub fn byte_size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Content checks that need no identity: media type first, then size.
    pub fn validate(&self) -> Result<(), UploadError> {
        if !self.content_type.is_image() {
            return Err(UploadError::UnsupportedType {
                content_type: self.content_type.to_string(),
            });
        }

        let size = self.byte_size();
        if size > MAX_UPLOAD_BYTES {
            return Err(UploadError::FileTooLarge {
                size,
                max: MAX_UPLOAD_BYTES,
            });
        }

        Ok(())
    }

    /// Pick the first image out of a multi-file drop.
    pub fn first_image<I>(files: I) -> Result<Self, UploadError>
    where
        I: IntoIterator<Item = UploadCandidate>,
    {
        let mut first_type = None;
        for file in files {
            if file.content_type.is_image() {
                return Ok(file);
            }
            first_type.get_or_insert_with(|| file.content_type.to_string());
        }

        Err(UploadError::UnsupportedType {
            content_type: first_type.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sized(content_type: &str, len: usize) -> UploadCandidate {
        UploadCandidate::new("f.bin", content_type, vec![0u8; len])
    }

    #[test]
    fn test_accepts_image_at_exact_limit() {
        let file = sized("image/png", MAX_UPLOAD_BYTES as usize);
        assert!(file.validate().is_ok());
    }

    #[test]
    fn test_rejects_image_one_byte_over_limit() {
        let file = sized("image/png", MAX_UPLOAD_BYTES as usize + 1);
        assert!(matches!(
            file.validate(),
            Err(UploadError::FileTooLarge { size, max }) if size == MAX_UPLOAD_BYTES + 1 && max == MAX_UPLOAD_BYTES
        ));
    }

    #[test]
    fn test_type_is_checked_before_size() {
        let file = sized("video/mp4", MAX_UPLOAD_BYTES as usize + 1);
        assert!(matches!(
            file.validate(),
            Err(UploadError::UnsupportedType { .. })
        ));
    }

    #[test]
    fn test_first_image_skips_non_images() {
        let files = vec![
            UploadCandidate::new("notes.txt", "text/plain", &b"hi"[..]),
            UploadCandidate::new("cat.png", "image/png", &b"png"[..]),
            UploadCandidate::new("dog.jpg", "image/jpeg", &b"jpg"[..]),
        ];

        let picked = UploadCandidate::first_image(files).unwrap();
        assert_eq!(picked.file_name, "cat.png");
    }

    #[test]
    fn test_first_image_without_images_is_unsupported() {
        let files = vec![UploadCandidate::new("notes.txt", "text/plain", &b"hi"[..])];
        let err = UploadCandidate::first_image(files).unwrap_err();
        assert_eq!(err.to_string(), "Please upload an image file");

        let err = UploadCandidate::first_image(Vec::new()).unwrap_err();
        assert!(matches!(err, UploadError::UnsupportedType { .. }));
    }
}
