//! ID type wrappers for type safety.

mod id_macro;

use id_macro::impl_id;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Provider-issued user identifier (stable for the lifetime of an account).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

/// Store-issued photo record identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoId(String);

/// Random identifier minted for every upload attempt.
///
/// Makes storage paths unique without consulting any existing listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UploadId(String);

impl_id!(UserId, PhotoId, UploadId);

impl UploadId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for UploadId {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_ids_are_distinct() {
        let a = UploadId::new();
        let b = UploadId::new();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 36);
    }

    #[test]
    fn test_blank_user_id_is_detected() {
        assert!(UserId::from("").is_blank());
        assert!(UserId::from("   ").is_blank());
        assert!(!UserId::from("uid-1").is_blank());
    }

    #[test]
    fn test_ids_serialize_as_plain_strings() {
        let id = PhotoId::from("doc-42");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"doc-42\"");
    }
}
