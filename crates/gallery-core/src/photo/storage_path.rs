//! Namespaced object keys for uploaded images.
//!
//! Layout: `photos/<ownerId>/<uploadId>-<sanitizedFilename>`. The random
//! upload id makes every path unique per owner, so concurrent uploads of the
//! same file never overwrite each other.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::{UploadId, UserId};

/// Top-level namespace of every stored photo.
pub const PHOTOS_PREFIX: &str = "photos";

const EMPTY_NAME_FALLBACK: &str = "unnamed";

/// Lower-case `name` and replace every character outside `[a-z0-9.]` with `-`.
///
/// Replacement is per UTF-16 code unit, matching keys already written by web
/// clients: a character outside the basic multilingual plane becomes `--`.
/// The result is idempotent and always matches `^[a-z0-9.-]+$`; an empty
/// name becomes `unnamed`.
pub fn sanitize_file_name(name: &str) -> String {
    let mut sanitized = String::with_capacity(name.len());
    for c in name.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '.' {
            sanitized.push(c);
        } else {
            sanitized.extend(std::iter::repeat('-').take(c.len_utf16()));
        }
    }

    if sanitized.is_empty() {
        EMPTY_NAME_FALLBACK.to_string()
    } else {
        sanitized
    }
}

/// Object storage key of one uploaded image.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoragePath(String);

impl StoragePath {
    pub fn derive(owner: &UserId, upload_id: &UploadId, original_file_name: &str) -> Self {
        Self(format!(
            "{PHOTOS_PREFIX}/{owner}/{upload_id}-{}",
            sanitize_file_name(original_file_name)
        ))
    }

    pub fn from_string(path: String) -> Self {
        Self(path)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last path segment: `<uploadId>-<sanitizedFilename>`.
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for StoragePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StoragePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    fn charset() -> Regex {
        Regex::new("^[a-z0-9.-]+$").unwrap()
    }

    #[test]
    fn test_sanitize_lowercases_and_replaces() {
        assert_eq!(sanitize_file_name("Cat.PNG"), "cat.png");
        assert_eq!(sanitize_file_name("my photo (1).jpg"), "my-photo--1-.jpg");
        assert_eq!(sanitize_file_name("a_b-c.webp"), "a-b-c.webp");
        assert_eq!(sanitize_file_name("été.jpg"), "-t-.jpg");
    }

    #[test]
    fn test_sanitize_replaces_each_utf16_unit() {
        assert_eq!(sanitize_file_name("🐱.png"), "--.png");
        assert_eq!(sanitize_file_name("a😀b.jpg"), "a--b.jpg");
    }

    #[test]
    fn test_sanitize_is_idempotent_and_matches_charset() {
        let samples = [
            "cat.png",
            "Holiday Photo 2024.JPG",
            "../../etc/passwd",
            "日本語.png",
            "🐱 cat.png",
            "İstanbul.jpeg",
            "with\ttab\nnewline",
            "",
            "...",
            "---",
        ];
        let re = charset();
        for sample in samples {
            let once = sanitize_file_name(sample);
            assert_eq!(sanitize_file_name(&once), once, "not idempotent for {sample:?}");
            assert!(re.is_match(&once), "{once:?} escapes charset");
        }
    }

    #[test]
    fn test_empty_name_uses_fallback() {
        assert_eq!(sanitize_file_name(""), "unnamed");
    }

    #[test]
    fn test_derive_builds_namespaced_path() {
        let owner = UserId::from("uid-1");
        let upload = UploadId::from("0000-1111");
        let path = StoragePath::derive(&owner, &upload, "Cat.png");

        assert_eq!(path.as_str(), "photos/uid-1/0000-1111-cat.png");
        assert_eq!(path.file_name(), "0000-1111-cat.png");
    }

    #[test]
    fn test_same_name_different_upload_ids_never_collide() {
        let owner = UserId::from("uid-1");
        let a = StoragePath::derive(&owner, &UploadId::new(), "cat.png");
        let b = StoragePath::derive(&owner, &UploadId::new(), "cat.png");
        assert_ne!(a, b);
    }
}
