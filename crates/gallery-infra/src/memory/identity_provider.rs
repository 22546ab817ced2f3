use async_trait::async_trait;
use gallery_core::ports::{IdentityProviderPort, ProviderError};
use gallery_core::session::ProviderUser;
use std::collections::HashMap;
use tokio::sync::{watch, Mutex};
use tracing::debug;

const MIN_PASSWORD_LEN: usize = 6;

/// Which provider call an injected failure applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderOp {
    CreateAccount,
    SignIn,
    SignOut,
    UpdateDisplayName,
}

#[derive(Debug, Clone)]
struct Account {
    uid: String,
    email: String,
    password: String,
    display_name: Option<String>,
}

impl Account {
    fn to_user(&self) -> ProviderUser {
        ProviderUser {
            uid: self.uid.clone(),
            email: Some(self.email.clone()),
            display_name: self.display_name.clone(),
        }
    }
}

#[derive(Default)]
struct State {
    /// Keyed by normalized (trimmed, lower-case) email.
    accounts: HashMap<String, Account>,
    signed_in: Option<String>,
    faults: HashMap<ProviderOp, ProviderError>,
}

impl State {
    fn take_fault(&mut self, op: ProviderOp) -> Result<(), ProviderError> {
        match self.faults.remove(&op) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Identity provider held in memory, reporting failures with the hosted
/// provider's `auth/...` codes.
pub struct InMemoryIdentityProvider {
    state: Mutex<State>,
    session_tx: watch::Sender<Option<ProviderUser>>,
}

impl Default for InMemoryIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn check_email(email: &str) -> Result<(), ProviderError> {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(ProviderError::new(
            "auth/invalid-email",
            "The email address is badly formatted.",
        )),
    }
}

impl InMemoryIdentityProvider {
    pub fn new() -> Self {
        let (session_tx, _) = watch::channel(None);
        Self {
            state: Mutex::new(State::default()),
            session_tx,
        }
    }

    /// Make the next call of `op` fail with `err`.
    pub async fn fail_next(&self, op: ProviderOp, err: ProviderError) {
        self.state.lock().await.faults.insert(op, err);
    }

    /// Drop the current session from the provider side, e.g. token expiry.
    pub async fn invalidate_session(&self) {
        self.state.lock().await.signed_in = None;
        self.session_tx.send_replace(None);
        debug!("Session invalidated by provider");
    }

    pub async fn account_count(&self) -> usize {
        self.state.lock().await.accounts.len()
    }

    fn push_session(&self, user: Option<ProviderUser>) {
        self.session_tx.send_replace(user);
    }
}

#[async_trait]
impl IdentityProviderPort for InMemoryIdentityProvider {
    async fn create_account(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ProviderUser, ProviderError> {
        let mut state = self.state.lock().await;
        state.take_fault(ProviderOp::CreateAccount)?;

        check_email(email)?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ProviderError::new(
                "auth/weak-password",
                "Password should be at least 6 characters",
            ));
        }
        let key = normalize_email(email);
        if state.accounts.contains_key(&key) {
            return Err(ProviderError::new(
                "auth/email-already-in-use",
                "The email address is already in use by another account.",
            ));
        }

        let account = Account {
            uid: uuid::Uuid::new_v4().simple().to_string(),
            email: email.trim().to_string(),
            password: password.to_string(),
            display_name: None,
        };
        let user = account.to_user();
        state.accounts.insert(key.clone(), account);
        state.signed_in = Some(key);
        self.push_session(Some(user.clone()));

        debug!(uid = %user.uid, "Account created");
        Ok(user)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<ProviderUser, ProviderError> {
        let mut state = self.state.lock().await;
        state.take_fault(ProviderOp::SignIn)?;

        check_email(email)?;
        let key = normalize_email(email);
        let account = state.accounts.get(&key).ok_or_else(|| {
            ProviderError::new("auth/user-not-found", "There is no user record for this email.")
        })?;
        if account.password != password {
            return Err(ProviderError::new(
                "auth/invalid-credential",
                "The supplied auth credential is incorrect.",
            ));
        }

        let user = account.to_user();
        state.signed_in = Some(key);
        self.push_session(Some(user.clone()));
        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        let mut state = self.state.lock().await;
        state.take_fault(ProviderOp::SignOut)?;

        state.signed_in = None;
        self.push_session(None);
        Ok(())
    }

    async fn update_display_name(&self, display_name: &str) -> Result<(), ProviderError> {
        let mut state = self.state.lock().await;
        state.take_fault(ProviderOp::UpdateDisplayName)?;

        let key = state.signed_in.clone().ok_or_else(|| {
            ProviderError::new("auth/no-current-user", "No user is currently signed in.")
        })?;
        let account = state.accounts.get_mut(&key).ok_or_else(|| {
            ProviderError::new("auth/user-not-found", "There is no user record for this email.")
        })?;
        account.display_name = Some(display_name.to_string());

        let user = account.to_user();
        self.push_session(Some(user));
        Ok(())
    }

    fn watch_session(&self) -> watch::Receiver<Option<ProviderUser>> {
        self.session_tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_account_signs_in() {
        let provider = InMemoryIdentityProvider::new();
        let session = provider.watch_session();

        let user = provider.create_account("a@x.com", "abcdef").await.unwrap();

        assert_eq!(user.email.as_deref(), Some("a@x.com"));
        assert_eq!(session.borrow().as_ref().map(|u| u.uid.clone()), Some(user.uid));
    }

    #[tokio::test]
    async fn test_create_account_error_codes() {
        let provider = InMemoryIdentityProvider::new();
        provider.create_account("a@x.com", "abcdef").await.unwrap();

        let cases = [
            ("not-an-email", "abcdef", "auth/invalid-email"),
            ("b@x.com", "abc", "auth/weak-password"),
            ("A@X.com", "abcdef", "auth/email-already-in-use"),
        ];
        for (email, password, code) in cases {
            let err = provider.create_account(email, password).await.unwrap_err();
            assert_eq!(err.code, code);
        }
        assert_eq!(provider.account_count().await, 1);
    }

    #[tokio::test]
    async fn test_sign_in_error_codes() {
        let provider = InMemoryIdentityProvider::new();
        provider.create_account("a@x.com", "abcdef").await.unwrap();
        provider.sign_out().await.unwrap();

        let err = provider.sign_in("nobody@x.com", "abcdef").await.unwrap_err();
        assert_eq!(err.code, "auth/user-not-found");

        let err = provider.sign_in("a@x.com", "wrong!").await.unwrap_err();
        assert_eq!(err.code, "auth/invalid-credential");

        assert!(provider.watch_session().borrow().is_none());
    }

    #[tokio::test]
    async fn test_update_display_name_pushes_session() {
        let provider = InMemoryIdentityProvider::new();
        provider.create_account("a@x.com", "abcdef").await.unwrap();

        provider.update_display_name("Ava").await.unwrap();

        let session = provider.watch_session();
        let current = session.borrow().clone().unwrap();
        assert_eq!(current.display_name.as_deref(), Some("Ava"));
    }

    #[tokio::test]
    async fn test_update_display_name_requires_session() {
        let provider = InMemoryIdentityProvider::new();

        let err = provider.update_display_name("Ava").await.unwrap_err();

        assert_eq!(err.code, "auth/no-current-user");
    }

    #[tokio::test]
    async fn test_injected_fault_applies_once() {
        let provider = InMemoryIdentityProvider::new();
        provider.create_account("a@x.com", "abcdef").await.unwrap();
        provider
            .fail_next(
                ProviderOp::SignOut,
                ProviderError::new("auth/network-request-failed", "offline"),
            )
            .await;

        assert!(provider.sign_out().await.is_err());
        assert!(provider.watch_session().borrow().is_some());
        assert!(provider.sign_out().await.is_ok());
        assert!(provider.watch_session().borrow().is_none());
    }

    #[tokio::test]
    async fn test_invalidate_session() {
        let provider = InMemoryIdentityProvider::new();
        provider.create_account("a@x.com", "abcdef").await.unwrap();

        provider.invalidate_session().await;

        assert!(provider.watch_session().borrow().is_none());
    }
}
