//! Entry points for the presentation surface, bound to the current session.

use std::sync::Arc;

use gallery_core::{
    CollectionView, GalleryError, Identity, PhotoRecord, SignupOutcome, SubscriptionError,
    UploadCandidate, UserId,
};
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, info_span, Instrument};

use crate::deps::AppDeps;
use crate::task::BackgroundTask;
use crate::usecases::{
    SessionBinding, SessionStore, SubscribeCollection, SubscriptionHandle, UploadPhoto,
};

type CollectionSlot = Arc<Mutex<Option<SubscriptionHandle>>>;

/// The photo gallery workflow.
///
/// Owns at most one collection subscription. It is closed on logout, and
/// also when the provider pushes a session change that no longer matches
/// the subscription's owner.
pub struct PhotoGallery {
    session: Arc<SessionStore>,
    upload_photo: UploadPhoto,
    subscribe_collection: SubscribeCollection,
    collection: CollectionSlot,
    binding: SessionBinding,
    session_watcher: BackgroundTask,
}

impl PhotoGallery {
    /// Wire the use cases and start following the provider session.
    ///
    /// Must be called within a tokio runtime.
    pub fn start(deps: AppDeps) -> Self {
        let session = Arc::new(SessionStore::new(deps.identity_provider));
        let binding = session.start();
        let collection: CollectionSlot = Arc::new(Mutex::new(None));
        let session_watcher = watch_session(session.observe_session(), collection.clone());

        Self {
            session,
            upload_photo: UploadPhoto::from_ports(deps.object_storage, deps.document_store.clone()),
            subscribe_collection: SubscribeCollection::from_ports(deps.document_store, deps.clock),
            collection,
            binding,
            session_watcher,
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn current_identity(&self) -> Option<Identity> {
        self.session.current()
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Identity, GalleryError> {
        Ok(self.session.login(email, password).await?)
    }

    pub async fn signup(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<SignupOutcome, GalleryError> {
        Ok(self.session.signup(email, password, display_name).await?)
    }

    /// Sign out, then close the open collection subscription.
    pub async fn logout(&self) -> Result<(), GalleryError> {
        self.session.logout().await?;
        self.close_collection().await;
        Ok(())
    }

    /// Upload on behalf of the current session's user.
    pub async fn upload(&self, candidate: UploadCandidate) -> Result<PhotoRecord, GalleryError> {
        let owner = self.session.current().map(|identity| identity.id);
        Ok(self.upload_photo.execute(candidate, owner.as_ref()).await?)
    }

    /// Subscribe to the current user's photos, replacing any previous
    /// subscription.
    pub async fn open_collection<C, E>(&self, on_change: C, on_error: E) -> Result<(), GalleryError>
    where
        C: FnMut(CollectionView) + Send + 'static,
        E: FnOnce(SubscriptionError) + Send + 'static,
    {
        // Read the session under the slot lock so a concurrent session change
        // is seen by the watcher after this subscription is in place.
        let mut slot = self.collection.lock().await;
        let owner = self
            .session
            .current()
            .map(|identity| identity.id)
            .ok_or(SubscriptionError::NotAuthenticated)?;

        let handle = self
            .subscribe_collection
            .execute(owner.clone(), on_change, on_error);
        if let Some(previous) = slot.replace(handle) {
            previous.cancel();
        }

        info!(owner = %owner, "Collection opened");
        Ok(())
    }

    /// Cancel the open subscription and wait for its listener to be
    /// released. No callback runs once this returns.
    pub async fn close_collection(&self) {
        let taken = self.collection.lock().await.take();
        if let Some(mut handle) = taken {
            handle.cancel();
            handle.closed().await;
            info!(owner = %handle.owner(), "Collection closed");
        }
    }

    pub async fn has_open_collection(&self) -> bool {
        self.collection
            .lock()
            .await
            .as_ref()
            .is_some_and(SubscriptionHandle::is_active)
    }

    /// Stop following the provider and close the collection.
    pub async fn shutdown(&self) {
        self.binding.shutdown();
        self.session_watcher.cancel();
        self.close_collection().await;
        debug!("Gallery shut down");
    }
}

/// Close the subscription whenever the session stops matching its owner.
fn watch_session(
    mut session_rx: watch::Receiver<Option<Identity>>,
    collection: CollectionSlot,
) -> BackgroundTask {
    BackgroundTask::spawn(move |token| {
        async move {
            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    changed = session_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                }

                let current: Option<UserId> = session_rx
                    .borrow_and_update()
                    .as_ref()
                    .map(|identity| identity.id.clone());

                let mut slot = collection.lock().await;
                let stale = slot
                    .as_ref()
                    .is_some_and(|handle| Some(handle.owner()) != current.as_ref());
                if stale {
                    if let Some(handle) = slot.take() {
                        handle.cancel();
                        info!(owner = %handle.owner(), "Session ended; collection closed");
                    }
                }
            }
        }
        .instrument(info_span!("gallery.session_watcher"))
    })
}
