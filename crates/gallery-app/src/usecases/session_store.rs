//! Session lifecycle: observe, login, signup, logout.

use std::sync::Arc;

use gallery_core::ports::{IdentityProviderPort, ProviderError};
use gallery_core::session::{Identity, ProviderUser, SignupOutcome};
use gallery_core::SessionError;
use tokio::sync::watch;
use tracing::{debug, info, info_span, warn, Instrument};

use crate::task::BackgroundTask;

/// Holds the current identity and keeps it in step with the provider.
///
/// The session value lives in a `watch` channel: one writer (this store),
/// any number of observers, values replaced atomically.
pub struct SessionStore {
    identity_provider: Arc<dyn IdentityProviderPort>,
    session_tx: Arc<watch::Sender<Option<Identity>>>,
}

/// Binding of the provider's session stream to a [`SessionStore`].
///
/// Stopped by [`shutdown`](Self::shutdown) or on drop, whichever comes first.
#[derive(Debug)]
pub struct SessionBinding {
    task: BackgroundTask,
}

impl SessionBinding {
    pub fn shutdown(&self) {
        if !self.task.is_cancelled() {
            debug!("Stopping session binding");
        }
        self.task.cancel();
    }

    pub fn is_active(&self) -> bool {
        !self.task.is_cancelled() && !self.task.is_finished()
    }

    /// Wait until the binding task has exited.
    pub async fn stopped(&mut self) {
        self.task.join().await;
    }
}

fn map_provider_error(err: ProviderError) -> SessionError {
    SessionError::from_provider_code(&err.code)
}

impl SessionStore {
    pub fn new(identity_provider: Arc<dyn IdentityProviderPort>) -> Self {
        let (session_tx, _) = watch::channel(None);
        Self {
            identity_provider,
            session_tx: Arc::new(session_tx),
        }
    }

    /// Latest fully applied session value.
    pub fn current(&self) -> Option<Identity> {
        self.session_tx.borrow().clone()
    }

    /// Fresh receiver, seeded with the latest value.
    pub fn observe_session(&self) -> watch::Receiver<Option<Identity>> {
        self.session_tx.subscribe()
    }

    /// Bind the provider's session stream to the session value.
    ///
    /// The provider's current value is applied before this returns; the
    /// binding task applies later pushes only.
    pub fn start(&self) -> SessionBinding {
        let mut provider_rx = self.identity_provider.watch_session();
        let initial = provider_rx
            .borrow_and_update()
            .clone()
            .map(Identity::from_provider);
        apply(&self.session_tx, initial);
        let session_tx = self.session_tx.clone();

        let task = BackgroundTask::spawn(move |token| {
            async move {
                loop {
                    tokio::select! {
                        biased;
                        _ = token.cancelled() => break,
                        changed = provider_rx.changed() => {
                            if changed.is_err() {
                                warn!("Identity provider closed its session stream");
                                break;
                            }
                        }
                    }

                    let next = provider_rx
                        .borrow_and_update()
                        .clone()
                        .map(Identity::from_provider);
                    apply(&session_tx, next);
                }
                debug!("Session binding stopped");
            }
            .instrument(info_span!("usecase.session_store.binding"))
        });

        SessionBinding { task }
    }

    #[tracing::instrument(name = "usecase.session_store.login", skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<Identity, SessionError> {
        let user = self
            .identity_provider
            .sign_in(email, password)
            .await
            .map_err(|err| {
                warn!(provider_code = %err.code, "Login rejected by identity provider");
                map_provider_error(err)
            })?;

        let identity = Identity::from_provider(user);
        apply(&self.session_tx, Some(identity.clone()));

        info!(user_id = %identity.id, "Logged in");
        Ok(identity)
    }

    /// Create an account, then set its display name.
    ///
    /// A failed profile update does not undo the account: the outcome is
    /// marked degraded and the identity falls back to the email local part.
    #[tracing::instrument(name = "usecase.session_store.signup", skip(self, password))]
    pub async fn signup(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<SignupOutcome, SessionError> {
        let user = self
            .identity_provider
            .create_account(email, password)
            .await
            .map_err(|err| {
                warn!(provider_code = %err.code, "Signup rejected by identity provider");
                map_provider_error(err)
            })?;

        let outcome = match self
            .identity_provider
            .update_display_name(display_name)
            .await
        {
            Ok(()) => SignupOutcome::complete(Identity::from_provider(ProviderUser {
                display_name: Some(display_name.to_string()),
                ..user
            })),
            Err(err) => {
                warn!(
                    user_id = %user.uid,
                    provider_code = %err.code,
                    "Account created but display name update failed"
                );
                SignupOutcome::degraded(Identity::from_provider(ProviderUser {
                    display_name: None,
                    ..user
                }))
            }
        };

        apply(&self.session_tx, Some(outcome.identity.clone()));

        info!(
            user_id = %outcome.identity.id,
            degraded = outcome.profile_degraded,
            "Signed up"
        );
        Ok(outcome)
    }

    /// Sign out; the session is cleared only once the provider confirms.
    #[tracing::instrument(name = "usecase.session_store.logout", skip(self))]
    pub async fn logout(&self) -> Result<(), SessionError> {
        self.identity_provider.sign_out().await.map_err(|err| {
            warn!(error = %err, "Logout failed; keeping current session");
            SessionError::LogoutFailed {
                reason: err.to_string(),
            }
        })?;

        apply(&self.session_tx, None);
        info!("Logged out");
        Ok(())
    }
}

/// Replace the session value, notifying observers only on change.
fn apply(session_tx: &watch::Sender<Option<Identity>>, next: Option<Identity>) {
    session_tx.send_if_modified(|current| {
        if *current == next {
            false
        } else {
            *current = next;
            true
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use gallery_core::ports::mocks::MockIdentityProvider;
    use gallery_core::ErrorCode;
    use std::time::Duration;

    fn provider_user(uid: &str, email: &str, display_name: Option<&str>) -> ProviderUser {
        ProviderUser {
            uid: uid.to_string(),
            email: Some(email.to_string()),
            display_name: display_name.map(str::to_string),
        }
    }

    fn idle_provider() -> MockIdentityProvider {
        let mut provider = MockIdentityProvider::new();
        let (_tx, rx) = watch::channel(None);
        provider.expect_watch_session().returning(move || rx.clone());
        provider
    }

    async fn wait_for<F>(rx: &mut watch::Receiver<Option<Identity>>, predicate: F)
    where
        F: Fn(&Option<Identity>) -> bool,
    {
        tokio::time::timeout(Duration::from_secs(1), rx.wait_for(|value| predicate(value)))
            .await
            .expect("timed out waiting for session value")
            .expect("session channel closed");
    }

    #[tokio::test]
    async fn test_login_sets_session_before_returning() {
        let mut provider = idle_provider();
        provider
            .expect_sign_in()
            .withf(|email, password| email == "a@x.com" && password == "abcdef")
            .times(1)
            .returning(|_, _| Ok(provider_user("uid-a", "a@x.com", Some("Ava"))));
        let store = SessionStore::new(Arc::new(provider));

        let identity = store.login("a@x.com", "abcdef").await.unwrap();

        assert_eq!(identity.display_name, "Ava");
        assert_eq!(store.current(), Some(identity));
    }

    #[tokio::test]
    async fn test_login_maps_provider_codes() {
        let mut provider = idle_provider();
        provider
            .expect_sign_in()
            .returning(|_, _| Err(ProviderError::new("auth/wrong-password", "nope")));
        let store = SessionStore::new(Arc::new(provider));

        let err = store.login("a@x.com", "bad").await.unwrap_err();

        assert_eq!(err.code(), ErrorCode::InvalidCredentials);
        assert_eq!(err.to_string(), "Incorrect password");
        assert_eq!(store.current(), None);
    }

    #[tokio::test]
    async fn test_signup_with_profile_update() {
        let mut provider = idle_provider();
        provider
            .expect_create_account()
            .times(1)
            .returning(|_, _| Ok(provider_user("uid-a", "a@x.com", None)));
        provider
            .expect_update_display_name()
            .withf(|name| name == "Ava")
            .times(1)
            .returning(|_| Ok(()));
        let store = SessionStore::new(Arc::new(provider));

        let outcome = store.signup("a@x.com", "abcdef", "Ava").await.unwrap();

        assert!(!outcome.profile_degraded);
        assert_eq!(outcome.identity.display_name, "Ava");
        assert_eq!(store.current().unwrap().display_name, "Ava");
    }

    #[tokio::test]
    async fn test_signup_profile_failure_is_degraded_not_fatal() {
        let mut provider = idle_provider();
        provider
            .expect_create_account()
            .returning(|_, _| Ok(provider_user("uid-a", "ava@x.com", None)));
        provider
            .expect_update_display_name()
            .returning(|_| Err(ProviderError::new("auth/network-request-failed", "offline")));
        provider.expect_sign_out().never();
        let store = SessionStore::new(Arc::new(provider));

        let outcome = store.signup("ava@x.com", "abcdef", "Ava").await.unwrap();

        assert!(outcome.profile_degraded);
        assert_eq!(outcome.identity.display_name, "ava");
        assert!(store.current().is_some());
    }

    #[tokio::test]
    async fn test_signup_errors_are_mapped() {
        let cases = [
            ("auth/email-already-in-use", ErrorCode::EmailAlreadyInUse),
            ("auth/weak-password", ErrorCode::WeakPassword),
            ("auth/invalid-email", ErrorCode::InvalidEmail),
            ("auth/operation-not-allowed", ErrorCode::Unknown),
        ];

        for (code, expected) in cases {
            let mut provider = idle_provider();
            provider
                .expect_create_account()
                .returning(move |_, _| Err(ProviderError::new(code, "rejected")));
            provider.expect_update_display_name().never();
            let store = SessionStore::new(Arc::new(provider));

            let err = store.signup("a@x.com", "abcdef", "Ava").await.unwrap_err();
            assert_eq!(err.code(), expected, "{code}");
        }
    }

    #[tokio::test]
    async fn test_logout_failure_keeps_session() {
        let mut provider = idle_provider();
        provider
            .expect_sign_in()
            .returning(|_, _| Ok(provider_user("uid-a", "a@x.com", Some("Ava"))));
        provider
            .expect_sign_out()
            .times(1)
            .returning(|| Err(ProviderError::new("auth/internal-error", "boom")));
        let store = SessionStore::new(Arc::new(provider));
        store.login("a@x.com", "abcdef").await.unwrap();

        let err = store.logout().await.unwrap_err();

        assert_eq!(err.code(), ErrorCode::LogoutFailed);
        assert_eq!(err.to_string(), "Failed to log out");
        assert!(store.current().is_some());
    }

    #[tokio::test]
    async fn test_logout_clears_session() {
        let mut provider = idle_provider();
        provider
            .expect_sign_in()
            .returning(|_, _| Ok(provider_user("uid-a", "a@x.com", Some("Ava"))));
        provider.expect_sign_out().returning(|| Ok(()));
        let store = SessionStore::new(Arc::new(provider));
        store.login("a@x.com", "abcdef").await.unwrap();

        store.logout().await.unwrap();

        assert_eq!(store.current(), None);
    }

    #[tokio::test]
    async fn test_binding_follows_provider_pushes() {
        let (provider_tx, provider_rx) = watch::channel(None);
        let mut provider = MockIdentityProvider::new();
        provider
            .expect_watch_session()
            .times(1)
            .returning(move || provider_rx.clone());
        let store = SessionStore::new(Arc::new(provider));
        let mut observer = store.observe_session();

        let binding = store.start();
        provider_tx.send_replace(Some(provider_user("uid-b", "bo@x.com", None)));
        wait_for(&mut observer, |value| value.is_some()).await;
        assert_eq!(store.current().unwrap().display_name, "bo");

        // Provider-side invalidation
        provider_tx.send_replace(None);
        wait_for(&mut observer, |value| value.is_none()).await;

        binding.shutdown();
        binding.shutdown();
        assert!(!binding.is_active());
    }

    #[tokio::test]
    async fn test_shutdown_stops_applying_pushes() {
        let (provider_tx, provider_rx) = watch::channel(None);
        let mut provider = MockIdentityProvider::new();
        provider
            .expect_watch_session()
            .returning(move || provider_rx.clone());
        let store = SessionStore::new(Arc::new(provider));

        let mut binding = store.start();
        binding.shutdown();
        binding.stopped().await;

        provider_tx.send_replace(Some(provider_user("uid-b", "bo@x.com", None)));
        tokio::task::yield_now().await;

        assert_eq!(store.current(), None);
    }

    #[tokio::test]
    async fn test_login_right_after_start_survives_binding() {
        let mut provider = idle_provider();
        provider
            .expect_sign_in()
            .returning(|_, _| Ok(provider_user("uid-a", "a@x.com", Some("Ava"))));
        let store = SessionStore::new(Arc::new(provider));

        let _binding = store.start();
        store.login("a@x.com", "abcdef").await.unwrap();
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }

        assert_eq!(store.current().unwrap().id.as_str(), "uid-a");
    }

    #[tokio::test]
    async fn test_start_applies_existing_provider_session() {
        let (_provider_tx, provider_rx) =
            watch::channel(Some(provider_user("uid-b", "bo@x.com", None)));
        let mut provider = MockIdentityProvider::new();
        provider
            .expect_watch_session()
            .returning(move || provider_rx.clone());
        let store = SessionStore::new(Arc::new(provider));

        let _binding = store.start();

        assert_eq!(store.current().unwrap().id.as_str(), "uid-b");
    }

    #[tokio::test]
    async fn test_each_observer_is_seeded_with_latest_value() {
        let mut provider = idle_provider();
        provider
            .expect_sign_in()
            .returning(|_, _| Ok(provider_user("uid-a", "a@x.com", Some("Ava"))));
        let store = SessionStore::new(Arc::new(provider));
        store.login("a@x.com", "abcdef").await.unwrap();

        let late = store.observe_session();

        assert_eq!(late.borrow().as_ref().unwrap().id.as_str(), "uid-a");
    }
}
