use async_trait::async_trait;
use tokio::sync::watch;

use super::errors::ProviderError;
use crate::session::ProviderUser;

/// Hosted identity provider.
///
/// Successful `create_account` and `sign_in` also leave the provider signed
/// in, which it reports through [`watch_session`](Self::watch_session).
#[async_trait]
pub trait IdentityProviderPort: Send + Sync {
    async fn create_account(&self, email: &str, password: &str)
        -> Result<ProviderUser, ProviderError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<ProviderUser, ProviderError>;

    async fn sign_out(&self) -> Result<(), ProviderError>;

    /// Set the display name of the signed-in user.
    async fn update_display_name(&self, display_name: &str) -> Result<(), ProviderError>;

    /// Live session value: `Some` while signed in, `None` otherwise.
    fn watch_session(&self) -> watch::Receiver<Option<ProviderUser>>;
}
