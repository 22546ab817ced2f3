//! Live, owner-scoped view of the photo collection.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use gallery_core::photo::PendingReceipts;
use gallery_core::ports::{ClockPort, DocumentStorePort, PhotoQuery};
use gallery_core::{CollectionView, SubscriptionError, TimestampMs, UserId};
use tracing::{debug, error, info, info_span, warn, Instrument};

use crate::task::BackgroundTask;

/// Serializes callback delivery against cancellation.
type DeliveryGate = Arc<Mutex<()>>;

fn enter(gate: &DeliveryGate) -> MutexGuard<'_, ()> {
    gate.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Handle of one open collection subscription.
///
/// Cancelling stops deliveries and releases the live query. Once
/// [`cancel`](Self::cancel) returns, no callback is running and none will
/// run again. Cancellation is idempotent and also happens when the handle is
/// dropped.
///
/// Callbacks must not cancel their own subscription synchronously.
#[derive(Debug)]
pub struct SubscriptionHandle {
    owner: UserId,
    task: BackgroundTask,
    gate: DeliveryGate,
}

impl SubscriptionHandle {
    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    pub fn cancel(&self) {
        if !self.task.is_cancelled() {
            debug!(owner = %self.owner, "Cancelling collection subscription");
        }
        self.task.cancel();
        // Wait out a delivery that passed its cancellation check
        drop(enter(&self.gate));
    }

    pub fn is_cancelled(&self) -> bool {
        self.task.is_cancelled()
    }

    /// Whether the subscription still delivers.
    pub fn is_active(&self) -> bool {
        !self.task.is_cancelled() && !self.task.is_finished()
    }

    /// Wait until the delivery task has exited and released its listener.
    pub async fn closed(&mut self) {
        self.task.join().await;
    }
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Use case for subscribing to one owner's photos.
///
/// Each snapshot pushed by the store is projected into a full
/// [`CollectionView`] and handed to `on_change`. The first failure is
/// reported once through `on_error` and ends the subscription; there is no
/// reconnect.
pub struct SubscribeCollection {
    document_store: Arc<dyn DocumentStorePort>,
    clock: Arc<dyn ClockPort>,
}

impl SubscribeCollection {
    pub fn from_ports(document_store: Arc<dyn DocumentStorePort>, clock: Arc<dyn ClockPort>) -> Self {
        Self {
            document_store,
            clock,
        }
    }

    /// Register the live query and start delivering.
    ///
    /// Must be called within a tokio runtime.
    pub fn execute<C, E>(&self, owner: UserId, mut on_change: C, on_error: E) -> SubscriptionHandle
    where
        C: FnMut(CollectionView) + Send + 'static,
        E: FnOnce(SubscriptionError) + Send + 'static,
    {
        let document_store = self.document_store.clone();
        let clock = self.clock.clone();
        let query_owner = owner.clone();
        let span = info_span!("usecase.subscribe_collection.run", owner = %owner);
        let gate: DeliveryGate = Arc::new(Mutex::new(()));
        let task_gate = gate.clone();

        let task = BackgroundTask::spawn(move |token| {
            async move {
                let owner = query_owner;
                let registered = tokio::select! {
                    biased;
                    _ = token.cancelled() => return,
                    registered = document_store.live_query(PhotoQuery::for_owner(owner.clone())) => registered,
                };
                let mut live = match registered {
                    Ok(live) => live,
                    Err(err) => {
                        let _delivering = enter(&task_gate);
                        if !token.is_cancelled() {
                            error!(error = %err, "Failed to register live query");
                            on_error(SubscriptionError::failed(err.to_string()));
                        }
                        return;
                    }
                };
                info!("Collection subscription opened");

                let mut pending = PendingReceipts::new();
                loop {
                    let next = tokio::select! {
                        biased;
                        _ = token.cancelled() => break,
                        next = live.next() => next,
                    };
                    // Cancellation may land while a snapshot is in hand
                    let _delivering = enter(&task_gate);
                    if token.is_cancelled() {
                        break;
                    }

                    match next {
                        Some(Ok(snapshot)) => {
                            let view = CollectionView::project(
                                &owner,
                                snapshot.documents,
                                TimestampMs::from_epoch_millis(clock.now_ms()),
                                &mut pending,
                            );
                            debug!(photos = view.len(), pending = pending.len(), "Delivering snapshot");
                            on_change(view);
                        }
                        Some(Err(err)) => {
                            error!(error = %err, "Live query failed");
                            on_error(SubscriptionError::failed(err.to_string()));
                            break;
                        }
                        None => {
                            warn!("Live query closed by the store");
                            on_error(SubscriptionError::failed("live query closed"));
                            break;
                        }
                    }
                }

                live.close();
                info!("Collection subscription closed");
            }
            .instrument(span)
        });

        SubscriptionHandle { owner, task, gate }
    }
}
