use thiserror::Error;

/// Failure reported by the identity provider.
///
/// `code` is the provider's opaque identifier (e.g. `auth/weak-password`);
/// it is translated by the session store and never shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct ProviderError {
    pub code: String,
    pub message: String,
}

impl ProviderError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("object storage unavailable: {0}")]
    Unavailable(String),

    #[error("object write rejected: {0}")]
    Rejected(String),

    #[error("object not found: {0}")]
    NotFound(String),

    #[error("io error: {0}")]
    Io(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentStoreError {
    #[error("document store unavailable: {0}")]
    Unavailable(String),

    #[error("document write rejected: {0}")]
    Rejected(String),

    #[error("live query failed: {0}")]
    Listener(String),
}
