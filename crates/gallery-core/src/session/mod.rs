//! Session identity as seen by the rest of the workflow.

use serde::{Deserialize, Serialize};

use crate::ids::UserId;

/// A user as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderUser {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

/// The authenticated user of the current session.
///
/// Immutable for the lifetime of a session; cleared on logout or when the
/// provider invalidates the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: UserId,
    pub email: String,
    pub display_name: String,
}

impl Identity {
    pub fn new(id: UserId, email: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
            display_name: display_name.into(),
        }
    }

    /// Build from a provider user, falling back to the email's local part
    /// when no (non-blank) display name is set.
    pub fn from_provider(user: ProviderUser) -> Self {
        let email = user.email.unwrap_or_default();
        let display_name = match user.display_name {
            Some(name) if !name.trim().is_empty() => name,
            _ => email_local_part(&email).to_string(),
        };

        Self {
            id: UserId::from(user.uid),
            email,
            display_name,
        }
    }
}

/// Text before the first `@`, or the whole string if there is none.
pub fn email_local_part(email: &str) -> &str {
    email.split_once('@').map_or(email, |(local, _)| local)
}

/// Result of a successful signup.
///
/// The account exists either way; `profile_degraded` is set when the display
/// name could not be stored and the identity carries the email fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupOutcome {
    pub identity: Identity,
    pub profile_degraded: bool,
}

impl SignupOutcome {
    pub fn complete(identity: Identity) -> Self {
        Self {
            identity,
            profile_degraded: false,
        }
    }

    pub fn degraded(identity: Identity) -> Self {
        Self {
            identity,
            profile_degraded: true,
        }
    }
}
