//! Error taxonomy of the gallery workflow.
//!
//! Each component has its own error enum; all of them fold into
//! [`GalleryError`], whose [`ErrorCode`] is the stable identifier shared by
//! every presentation layer. `Display` output is the short, human-readable
//! message shown to the user verbatim.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable machine-readable error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    NotAuthenticated,
    UnsupportedType,
    FileTooLarge,
    UploadFailed,
    MetadataCommitFailed,
    SubscriptionFailed,
    InvalidCredentials,
    UserNotFound,
    EmailAlreadyInUse,
    WeakPassword,
    InvalidEmail,
    LogoutFailed,
    Unknown,
}

/// Session lifecycle failures (login, signup, logout).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Known account, wrong password. Shares the `InvalidCredentials` code.
    #[error("Incorrect password")]
    WrongPassword,

    #[error("No account found with this email")]
    UserNotFound,

    #[error("An account already exists with this email")]
    EmailAlreadyInUse,

    #[error("Password should be at least 6 characters")]
    WeakPassword,

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Failed to log out")]
    LogoutFailed { reason: String },

    /// Any provider code without a dedicated variant.
    #[error("An error occurred. Please try again")]
    Unknown { provider_code: String },
}

impl SessionError {
    /// Translate an opaque provider error code.
    ///
    /// Total: every unmapped code becomes [`SessionError::Unknown`], so no raw
    /// provider error ever reaches the user.
    pub fn from_provider_code(code: &str) -> Self {
        match code {
            "auth/invalid-credential" => Self::InvalidCredentials,
            "auth/wrong-password" => Self::WrongPassword,
            "auth/user-not-found" => Self::UserNotFound,
            "auth/email-already-in-use" => Self::EmailAlreadyInUse,
            "auth/weak-password" => Self::WeakPassword,
            "auth/invalid-email" => Self::InvalidEmail,
            other => Self::Unknown {
                provider_code: other.to_string(),
            },
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidCredentials | Self::WrongPassword => ErrorCode::InvalidCredentials,
            Self::UserNotFound => ErrorCode::UserNotFound,
            Self::EmailAlreadyInUse => ErrorCode::EmailAlreadyInUse,
            Self::WeakPassword => ErrorCode::WeakPassword,
            Self::InvalidEmail => ErrorCode::InvalidEmail,
            Self::LogoutFailed { .. } => ErrorCode::LogoutFailed,
            Self::Unknown { .. } => ErrorCode::Unknown,
        }
    }
}

/// Upload coordinator failures.
///
/// The first three are validation errors raised before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("Please log in to upload photos")]
    NotAuthenticated,

    #[error("Please upload an image file")]
    UnsupportedType { content_type: String },

    #[error("File size must be less than 10MB")]
    FileTooLarge { size: u64, max: u64 },

    /// Object write or URL resolution failed; safe to retry.
    #[error("Failed to upload image. Please try again.")]
    UploadFailed { reason: String },

    /// The object is stored but its metadata record is not.
    #[error("Failed to save photo details. Please try again.")]
    MetadataCommitFailed {
        reason: String,
        orphaned_path: String,
    },
}

impl UploadError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotAuthenticated => ErrorCode::NotAuthenticated,
            Self::UnsupportedType { .. } => ErrorCode::UnsupportedType,
            Self::FileTooLarge { .. } => ErrorCode::FileTooLarge,
            Self::UploadFailed { .. } => ErrorCode::UploadFailed,
            Self::MetadataCommitFailed { .. } => ErrorCode::MetadataCommitFailed,
        }
    }

    /// Raised before any network effect.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::NotAuthenticated | Self::UnsupportedType { .. } | Self::FileTooLarge { .. }
        )
    }
}

/// Collection subscription failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubscriptionError {
    #[error("Please log in to view your photos")]
    NotAuthenticated,

    #[error("Failed to load photos")]
    SubscriptionFailed { reason: String },
}

impl SubscriptionError {
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::SubscriptionFailed {
            reason: reason.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotAuthenticated => ErrorCode::NotAuthenticated,
            Self::SubscriptionFailed { .. } => ErrorCode::SubscriptionFailed,
        }
    }
}

/// Any workflow failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GalleryError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error(transparent)]
    Subscription(#[from] SubscriptionError),
}

impl GalleryError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Session(err) => err.code(),
            Self::Upload(err) => err.code(),
            Self::Subscription(err) => err.code(),
        }
    }

    /// Short message for the presentation surface.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}
