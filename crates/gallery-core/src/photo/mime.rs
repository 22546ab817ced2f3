use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

const IMAGE_PREFIX: &str = "image/";

/// Declared media type of an uploaded file, as reported by the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct MimeType(pub String);

impl MimeType {
    pub fn image_png() -> Self {
        Self("image/png".into())
    }
    pub fn image_jpeg() -> Self {
        Self("image/jpeg".into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Only the `image/` prefix is checked; the bytes are never sniffed.
    pub fn is_image(&self) -> bool {
        self.0.starts_with(IMAGE_PREFIX)
    }
}

impl fmt::Display for MimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MimeType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(MimeType(s.to_string()))
    }
}

impl From<&str> for MimeType {
    fn from(s: &str) -> Self {
        MimeType(s.to_string())
    }
}
